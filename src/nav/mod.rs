//! Navigation state machine
//!
//! The navigator is the single owner of the current mode, the folder
//! collection and the running test session. Every command goes through it,
//! and every operation checks the mode before touching anything:
//!
//! ```text
//! Home -> InFolder -> InTestSession -> InReport -> InFolder -> Home
//!                                          \-----------------> Home
//! ```
//!
//! A failing operation leaves mode, folders and session exactly as they were.

use tracing::{debug, info};

use crate::error::{RequiredMode, Result, StudyError};
use crate::model::{Card, CardEdit, CardFilter, Folder};
use crate::session::{AnswerOutcome, ScoreSummary, SessionPlan, TestSession};
use crate::store::FolderStore;

/// Which mode the application is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationState {
    /// Folder list
    #[default]
    Home,
    /// Inside a folder, looking at its cards
    InFolder { folder: usize },
    /// Answering cards from a folder
    InTestSession { folder: usize },
    /// Looking at the score of a finished session
    InReport { folder: usize },
}

impl NavigationState {
    /// Index of the active folder, if any
    pub fn active_folder(&self) -> Option<usize> {
        match *self {
            NavigationState::Home => None,
            NavigationState::InFolder { folder }
            | NavigationState::InTestSession { folder }
            | NavigationState::InReport { folder } => Some(folder),
        }
    }

    /// Short label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            NavigationState::Home => "home",
            NavigationState::InFolder { .. } => "folder",
            NavigationState::InTestSession { .. } => "test",
            NavigationState::InReport { .. } => "report",
        }
    }
}

/// What `next_card` led to
#[derive(Debug, Clone, PartialEq)]
pub enum NextCard {
    /// A new current card
    Card(Card),
    /// The queue ran out and the session moved to the report
    Finished(ScoreSummary),
}

/// Owner of mode, folders and test session
#[derive(Debug)]
pub struct Navigator {
    state: NavigationState,
    store: FolderStore,
    session: Option<TestSession>,
}

impl Navigator {
    /// Start at home over a folder collection
    pub fn new(store: FolderStore) -> Self {
        Self { state: NavigationState::Home, store, session: None }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn store(&self) -> &FolderStore {
        &self.store
    }

    pub fn folders(&self) -> &[Folder] {
        self.store.folders()
    }

    /// The running or finished test session
    pub fn session(&self) -> Option<&TestSession> {
        self.session.as_ref()
    }

    /// The folder that is open, if any
    pub fn active_folder(&self) -> Option<&Folder> {
        self.state.active_folder().and_then(|i| self.store.folders().get(i))
    }

    /// Cards shown in the folder view; empty at home
    pub fn displayed_cards(&self) -> Vec<&Card> {
        self.state
            .active_folder()
            .and_then(|i| self.store.filtered_cards(i).ok())
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Guards
    // ---------------------------------------------------------------------

    fn require_home(&self) -> Result<()> {
        match self.state {
            NavigationState::Home => Ok(()),
            _ => Err(StudyError::invalid_state(RequiredMode::Home)),
        }
    }

    fn require_in_folder(&self) -> Result<usize> {
        match self.state {
            NavigationState::InFolder { folder } => Ok(folder),
            _ => Err(StudyError::invalid_state(RequiredMode::InFolder)),
        }
    }

    fn require_in_session(&self) -> Result<usize> {
        match self.state {
            NavigationState::InTestSession { folder } => Ok(folder),
            _ => Err(StudyError::invalid_state(RequiredMode::InTestSession)),
        }
    }

    fn require_in_report(&self) -> Result<usize> {
        match self.state {
            NavigationState::InReport { folder } => Ok(folder),
            _ => Err(StudyError::invalid_state(RequiredMode::InReport)),
        }
    }

    fn session_mut(&mut self) -> Result<&mut TestSession> {
        self.session.as_mut().ok_or(StudyError::NoActiveSession)
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Open a folder from the home directory
    pub fn enter_folder(&mut self, index: usize) -> Result<&Folder> {
        self.require_home()?;
        self.store.folder(index)?;

        self.store.set_filter(CardFilter::All);
        self.state = NavigationState::InFolder { folder: index };
        debug!("Entered folder {}", index);
        self.store.folder(index)
    }

    /// Leave the open folder
    pub fn exit_folder_to_home(&mut self) -> Result<()> {
        self.require_in_folder()?;
        self.go_home();
        Ok(())
    }

    /// Start a test session over the open folder
    pub fn start_test_session(&mut self, plan: &SessionPlan) -> Result<&Card> {
        let folder = self.require_in_folder()?;
        let session = TestSession::from_plan(folder, self.store.folder(folder)?, plan)?;

        info!("Test session started with {} cards", session.len());
        self.state = NavigationState::InTestSession { folder };
        self.session.insert(session).current_card()
    }

    /// Card currently being tested
    pub fn current_card(&self) -> Result<&Card> {
        self.require_in_session()?;
        self.session.as_ref().ok_or(StudyError::NoActiveSession)?.current_card()
    }

    /// Answer the current card
    pub fn submit_answer(&mut self, candidate: &str) -> Result<AnswerOutcome> {
        self.require_in_session()?;
        self.session_mut()?.submit_answer(candidate)
    }

    /// Reveal the current card's answer, scoring it as wrong
    pub fn reveal_answer(&mut self) -> Result<AnswerOutcome> {
        self.require_in_session()?;
        self.session_mut()?.reveal_answer()
    }

    /// Move to the next card, ending the session when the queue runs out
    pub fn next_card(&mut self) -> Result<NextCard> {
        self.require_in_session()?;
        let snapshot = self.session_mut()?.clone();

        if self.session_mut()?.next_card()? {
            return Ok(NextCard::Card(self.current_card()?.clone()));
        }

        match self.end_test_session() {
            Ok(summary) => Ok(NextCard::Finished(summary)),
            Err(e) => {
                self.session = Some(snapshot);
                Err(e)
            }
        }
    }

    /// Finish the session and show its report
    ///
    /// Attempted cards get their result stored as their last score; the
    /// session itself stays around, frozen, until the report is left.
    pub fn end_test_session(&mut self) -> Result<ScoreSummary> {
        let folder = self.require_in_session()?;
        let summary = self.session.as_ref().ok_or(StudyError::NoActiveSession)?.summary();

        self.store.record_scores(folder, &summary.per_card)?;

        let summary = self.session_mut()?.finish();
        self.state = NavigationState::InReport { folder };
        info!("Test session ended: {}", summary.display());
        Ok(summary)
    }

    /// Score of the finished session
    pub fn report(&self) -> Result<ScoreSummary> {
        self.require_in_report()?;
        Ok(self.session.as_ref().ok_or(StudyError::NoActiveSession)?.summary())
    }

    /// Leave the report back into the folder
    pub fn exit_report(&mut self) -> Result<()> {
        let folder = self.require_in_report()?;
        self.session = None;
        self.state = NavigationState::InFolder { folder };
        Ok(())
    }

    /// Leave the report straight to the home directory
    pub fn exit_report_to_home(&mut self) -> Result<()> {
        self.require_in_report()?;
        self.go_home();
        Ok(())
    }

    fn go_home(&mut self) {
        self.session = None;
        self.store.set_filter(CardFilter::All);
        self.state = NavigationState::Home;
        debug!("Returned to home");
    }

    // ---------------------------------------------------------------------
    // Folder edits (home only)
    // ---------------------------------------------------------------------

    /// Create an empty folder, returning its index
    pub fn add_folder(&mut self, name: &str) -> Result<usize> {
        self.require_home()?;
        self.store.add_folder(Folder::new(name)?)
    }

    /// Remove a folder and its file
    pub fn delete_folder(&mut self, index: usize) -> Result<Folder> {
        self.require_home()?;
        self.store.delete_folder(index)
    }

    pub fn rename_folder(&mut self, index: usize, name: &str) -> Result<()> {
        self.require_home()?;
        self.store.rename_folder(index, name)
    }

    // ---------------------------------------------------------------------
    // Card edits (inside a folder only)
    // ---------------------------------------------------------------------

    pub fn add_card(&mut self, card: Card) -> Result<()> {
        let folder = self.require_in_folder()?;
        self.store.add_card(folder, card)
    }

    /// Delete a card by value
    pub fn delete_card(&mut self, card: &Card) -> Result<()> {
        let folder = self.require_in_folder()?;
        self.store.delete_card(folder, card)
    }

    /// Replace a card by value
    pub fn set_card(&mut self, old: &Card, new: Card) -> Result<()> {
        let folder = self.require_in_folder()?;
        self.store.set_card(folder, old, new)
    }

    /// Delete the card at an index of the displayed list
    pub fn delete_card_at(&mut self, index: usize) -> Result<Card> {
        let folder = self.require_in_folder()?;
        let card = self.store.filtered_card(folder, index)?;
        self.delete_card(&card)?;
        Ok(card)
    }

    /// Edit the card at an index of the displayed list, returning the new card
    pub fn edit_card_at(&mut self, index: usize, edit: &CardEdit) -> Result<Card> {
        let folder = self.require_in_folder()?;
        let old = self.store.filtered_card(folder, index)?;
        let new = edit.apply(&old)?;
        self.set_card(&old, new.clone())?;
        Ok(new)
    }

    /// Narrow the displayed card list, returning how many cards remain
    pub fn set_filter(&mut self, filter: CardFilter) -> Result<usize> {
        let folder = self.require_in_folder()?;
        self.store.set_filter(filter);
        Ok(self.store.filtered_cards(folder)?.len())
    }

    /// Persist the open folder's current contents
    pub fn commit_active_card_folder(&self) -> Result<()> {
        let folder = self
            .state
            .active_folder()
            .ok_or(StudyError::invalid_state(RequiredMode::InFolder))?;
        self.store.commit_folder(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexKind;
    use crate::session::SessionOrder;
    use crate::storage::StorageManager;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn card(q: &str, a: &str) -> Card {
        Card::new(q, a).unwrap()
    }

    fn navigator(dir: &TempDir) -> Navigator {
        let folders = vec![
            Folder::with_cards("Capitals", vec![card("France?", "Paris")]).unwrap(),
            Folder::with_cards("Planets", vec![card("Largest?", "Jupiter"), card("Red?", "Mars")])
                .unwrap(),
            Folder::new("Empty").unwrap(),
        ];
        Navigator::new(FolderStore::new(folders, StorageManager::new(dir.path())))
    }

    fn invalid_state(err: StudyError) -> Option<RequiredMode> {
        match err {
            StudyError::InvalidState { required } => Some(required),
            _ => None,
        }
    }

    #[test]
    fn starts_at_home() {
        let dir = TempDir::new().unwrap();
        let nav = navigator(&dir);
        assert_eq!(nav.state(), NavigationState::Home);
        assert!(nav.session().is_none());
        assert!(nav.active_folder().is_none());
        assert!(nav.displayed_cards().is_empty());
    }

    #[test]
    fn enter_and_exit_folder() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);

        assert_eq!(nav.enter_folder(1).unwrap().name(), "Planets");
        assert_eq!(nav.state(), NavigationState::InFolder { folder: 1 });
        assert_eq!(nav.displayed_cards().len(), 2);

        nav.exit_folder_to_home().unwrap();
        assert_eq!(nav.state(), NavigationState::Home);
    }

    #[test]
    fn enter_folder_out_of_range_keeps_home() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        let err = nav.enter_folder(5).unwrap_err();
        assert!(matches!(err, StudyError::IndexOutOfRange { kind: IndexKind::Folder, .. }));
        assert_eq!(nav.state(), NavigationState::Home);
    }

    #[test]
    fn enter_folder_from_inside_folder_needs_home() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();
        assert_eq!(invalid_state(nav.enter_folder(1).unwrap_err()), Some(RequiredMode::Home));
        assert_eq!(nav.state(), NavigationState::InFolder { folder: 0 });
    }

    #[test]
    fn exit_folder_at_home_needs_folder() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        let err = nav.exit_folder_to_home().unwrap_err();
        assert_eq!(invalid_state(err), Some(RequiredMode::InFolder));
    }

    #[test]
    fn card_edits_outside_folder_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        let before: Vec<Folder> = nav.folders().to_vec();

        assert!(invalid_state(nav.add_card(card("q", "a")).unwrap_err()).is_some());
        assert!(invalid_state(nav.delete_card(&card("France?", "Paris")).unwrap_err()).is_some());
        assert!(invalid_state(nav.delete_card_at(0).unwrap_err()).is_some());
        assert_eq!(nav.folders(), before.as_slice());
    }

    #[test]
    fn folder_edits_inside_folder_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();

        assert_eq!(invalid_state(nav.add_folder("New").unwrap_err()), Some(RequiredMode::Home));
        assert_eq!(invalid_state(nav.delete_folder(0).unwrap_err()), Some(RequiredMode::Home));
        assert_eq!(nav.folders().len(), 3);
    }

    #[test]
    fn delete_on_empty_filtered_view_is_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();
        assert_eq!(nav.set_filter(CardFilter::keywords(["nothing"])).unwrap(), 0);

        let err = nav.delete_card_at(0).unwrap_err();
        assert!(matches!(err, StudyError::IndexOutOfRange { kind: IndexKind::Card, len: 0, .. }));
        assert_eq!(nav.folders()[0].len(), 1);
        assert!(!nav.store().storage().folder_path("Capitals").exists());
    }

    #[test]
    fn index_commands_use_filtered_view() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(1).unwrap();
        nav.set_filter(CardFilter::keywords(["red"])).unwrap();

        let deleted = nav.delete_card_at(0).unwrap();
        assert_eq!(deleted.answer(), "Mars");
        assert_eq!(nav.folders()[1].cards(), &[card("Largest?", "Jupiter")]);
    }

    #[test]
    fn edit_card_at_replaces_card() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();

        let edit = CardEdit { question: Some("Capital of France?".into()), ..Default::default() };
        let new = nav.edit_card_at(0, &edit).unwrap();
        assert_eq!(new.question(), "Capital of France?");
        assert_eq!(nav.folders()[0].cards(), &[new]);
    }

    #[test]
    fn stale_card_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();
        let stale = card("Gone?", "Yes");
        assert!(matches!(nav.delete_card(&stale), Err(StudyError::CardNotFound)));
        assert!(matches!(nav.set_card(&stale, card("q", "a")), Err(StudyError::CardNotFound)));
    }

    #[test]
    fn empty_folder_cannot_start_session() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(2).unwrap();
        assert!(matches!(
            nav.start_test_session(&SessionPlan::default()),
            Err(StudyError::EmptySession)
        ));
        assert_eq!(nav.state(), NavigationState::InFolder { folder: 2 });
        assert!(nav.session().is_none());
    }

    #[test]
    fn session_commands_outside_session_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();

        let in_session = Some(RequiredMode::InTestSession);
        assert_eq!(invalid_state(nav.submit_answer("x").unwrap_err()), in_session);
        assert_eq!(invalid_state(nav.next_card().unwrap_err()), in_session);
        assert_eq!(invalid_state(nav.end_test_session().unwrap_err()), in_session);
        assert_eq!(invalid_state(nav.exit_report().unwrap_err()), Some(RequiredMode::InReport));
    }

    #[test]
    fn single_card_session_ends_in_report() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();

        let first = nav.start_test_session(&SessionPlan::default()).unwrap().clone();
        assert_eq!(first.question(), "France?");
        assert_eq!(nav.state(), NavigationState::InTestSession { folder: 0 });

        assert!(nav.submit_answer("Paris").unwrap().correct);
        let NextCard::Finished(summary) = nav.next_card().unwrap() else {
            panic!("expected the session to finish");
        };
        assert_eq!(summary.display(), "1/1");
        assert_eq!(nav.state(), NavigationState::InReport { folder: 0 });
        assert!(nav.session().is_some());
        assert_eq!(nav.report().unwrap().display(), "1/1");

        nav.exit_report().unwrap();
        assert_eq!(nav.state(), NavigationState::InFolder { folder: 0 });
        assert!(nav.session().is_none());
    }

    #[test]
    fn ending_session_stores_last_scores() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(1).unwrap();
        nav.start_test_session(&SessionPlan::default()).unwrap();
        nav.submit_answer("Saturn").unwrap();
        nav.end_test_session().unwrap();

        let cards = nav.folders()[1].cards();
        assert_eq!(cards[0].last_score(), Some(0.0));
        assert_eq!(cards[1].last_score(), None);

        let reloaded = nav.store().storage().read_folders().unwrap();
        let planets = reloaded.folders.iter().find(|f| f.name() == "Planets").unwrap();
        assert_eq!(planets.cards()[0].last_score(), Some(0.0));
    }

    #[test]
    fn report_can_exit_straight_home() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(0).unwrap();
        nav.start_test_session(&SessionPlan::ordered(SessionOrder::Shuffled)).unwrap();
        nav.end_test_session().unwrap();

        nav.exit_report_to_home().unwrap();
        assert_eq!(nav.state(), NavigationState::Home);
        assert!(nav.session().is_none());
    }

    #[test]
    fn next_card_shows_following_card() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        nav.enter_folder(1).unwrap();
        nav.start_test_session(&SessionPlan::default()).unwrap();

        assert!(matches!(nav.next_card(), Err(StudyError::NotYetAnswered)));
        nav.reveal_answer().unwrap();
        assert!(matches!(nav.submit_answer("Jupiter"), Err(StudyError::AlreadyAnswered)));
        assert_eq!(nav.next_card().unwrap(), NextCard::Card(card("Red?", "Mars")));
        assert_eq!(nav.current_card().unwrap().answer(), "Mars");
    }

    #[test]
    fn failed_score_save_keeps_session_running() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let folders = vec![Folder::with_cards("Capitals", vec![card("France?", "Paris")]).unwrap()];
        let mut nav = Navigator::new(FolderStore::new(folders, StorageManager::new(blocker)));

        nav.enter_folder(0).unwrap();
        nav.start_test_session(&SessionPlan::default()).unwrap();
        nav.submit_answer("Paris").unwrap();

        assert!(nav.next_card().unwrap_err().is_storage_failure());
        assert_eq!(nav.state(), NavigationState::InTestSession { folder: 0 });
        let session = nav.session().unwrap();
        assert_eq!(session.position(), 0);
        assert!(session.is_answered());
        assert_eq!(nav.folders()[0].cards()[0].last_score(), None);
    }

    #[test]
    fn commit_requires_active_folder() {
        let dir = TempDir::new().unwrap();
        let mut nav = navigator(&dir);
        assert!(nav.commit_active_card_folder().is_err());

        nav.enter_folder(0).unwrap();
        nav.commit_active_card_folder().unwrap();
        assert!(nav.store().storage().folder_path("Capitals").exists());
    }

    proptest! {
        #[test]
        fn enter_folder_succeeds_exactly_in_range(index in 0usize..10) {
            let dir = TempDir::new().unwrap();
            let mut nav = navigator(&dir);
            let count = nav.folders().len();

            match nav.enter_folder(index) {
                Ok(_) => {
                    prop_assert!(index < count);
                    prop_assert_eq!(nav.state(), NavigationState::InFolder { folder: index });
                }
                Err(StudyError::IndexOutOfRange { .. }) => {
                    prop_assert!(index >= count);
                    prop_assert_eq!(nav.state(), NavigationState::Home);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        #[test]
        fn rejected_card_edits_never_change_folders(question in "[a-z]{1,8}", repeats in 1usize..4) {
            let dir = TempDir::new().unwrap();
            let mut nav = navigator(&dir);
            let before: Vec<Folder> = nav.folders().to_vec();

            for _ in 0..repeats {
                let is_invalid_state = matches!(
                    nav.add_card(card(&question, "a")),
                    Err(StudyError::InvalidState { .. })
                );
                prop_assert!(is_invalid_state);
                let is_invalid_state = matches!(
                    nav.delete_card_at(0),
                    Err(StudyError::InvalidState { .. })
                );
                prop_assert!(is_invalid_state);
            }
            prop_assert_eq!(nav.folders(), before.as_slice());
        }
    }
}
