use crate::api::ApiResult;
use crate::models::{Note, NoteDraft};
use crate::state::{AppContext, EditorMode};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Mediates every mutation of the notes collection, the selection and the
/// editor mode through the store client, and reconciles local state from the
/// responses.
///
/// Store calls are spawned on the browser event loop; each completion funnels
/// through a synchronous `apply_*` method, so the reconciliation rules are
/// plain functions over signal state. A completion that lands after a later
/// `refresh()` still applies its patch; last write wins by arrival order,
/// which is acceptable at this scale.
#[derive(Clone, Copy)]
pub(crate) struct NotesController {
    app_state: AppContext,
}

impl NotesController {
    pub fn new(app_state: AppContext) -> Self {
        Self { app_state }
    }

    /// Reload the collection from the store, replacing it wholesale.
    pub fn refresh(&self) {
        let st = self.app_state.0;
        st.loading.set(true);
        st.error.set(None);

        let api = st.api.get_untracked();
        let this = *self;
        spawn_local(async move {
            let result = api.list_notes().await;
            this.apply_refresh(result);
        });
    }

    pub(crate) fn apply_refresh(&self, result: ApiResult<Vec<Note>>) {
        let st = self.app_state.0;
        match result {
            Ok(notes) => {
                let selected = st.selected_id.get_untracked();
                st.selected_id
                    .set(reconcile_selection(&notes, selected.as_deref()));
                st.notes.set(notes);
                st.error.set(None);
            }
            Err(e) => {
                // Stale-but-present data beats blanking the view.
                st.error.set(Some(e.to_string()));
            }
        }
        st.loading.set(false);
    }

    /// Show a note in the detail view. No existence check: the view resolves
    /// the id lazily against the collection. No network call.
    pub fn select(&self, id: String) {
        let st = self.app_state.0;
        st.selected_id.set(Some(id));
        st.mode.set(EditorMode::Viewing);
        st.form_error.set(None);
    }

    pub fn begin_create(&self) {
        let st = self.app_state.0;
        st.mode.set(EditorMode::Creating);
        st.form_error.set(None);
    }

    pub fn begin_edit(&self, note: Note) {
        let st = self.app_state.0;
        st.mode.set(EditorMode::Editing(note));
        st.form_error.set(None);
    }

    pub fn cancel_edit(&self) {
        let st = self.app_state.0;
        st.mode.set(EditorMode::Viewing);
        st.form_error.set(None);
    }

    /// Persist the form contents: update when a note is being edited, create
    /// otherwise. Suppressed while a save is already in flight (the submit
    /// button is disabled too; this is a debounce, not a correctness guard).
    pub fn save(&self, draft: NoteDraft) {
        let st = self.app_state.0;
        if st.saving.get_untracked() {
            return;
        }

        let draft = draft.trimmed();
        let api = st.api.get_untracked();
        let this = *self;

        match st.mode.get_untracked() {
            EditorMode::Viewing => {}
            EditorMode::Creating => {
                st.saving.set(true);
                st.form_error.set(None);
                spawn_local(async move {
                    let result = api.create_note(&draft).await;
                    this.apply_create(result);
                });
            }
            EditorMode::Editing(note) => {
                st.saving.set(true);
                st.form_error.set(None);
                spawn_local(async move {
                    let result = api.update_note(&note.id, &draft).await;
                    this.apply_update(result);
                });
            }
        }
    }

    pub(crate) fn apply_create(&self, result: ApiResult<Note>) {
        let st = self.app_state.0;
        match result {
            Ok(note) => {
                st.selected_id.set(Some(note.id.clone()));
                st.notes.update(|notes| notes.insert(0, note));
                st.mode.set(EditorMode::Viewing);
                st.form_error.set(None);
            }
            // Stay in edit mode so the user's input survives for a retry.
            Err(e) => st.form_error.set(Some(e.to_string())),
        }
        st.saving.set(false);
    }

    pub(crate) fn apply_update(&self, result: ApiResult<Note>) {
        let st = self.app_state.0;
        match result {
            Ok(note) => {
                st.selected_id.set(Some(note.id.clone()));
                st.notes.update(|notes| replace_note(notes, note));
                st.mode.set(EditorMode::Viewing);
                st.form_error.set(None);
            }
            Err(e) => st.form_error.set(Some(e.to_string())),
        }
        st.saving.set(false);
    }

    /// Stage a note for deletion and open the confirmation prompt.
    pub fn request_delete(&self, note: Note) {
        self.app_state.0.delete_target.set(Some(note));
    }

    /// Discard the staged target without contacting the store.
    pub fn cancel_delete(&self) {
        self.app_state.0.delete_target.set(None);
    }

    pub fn confirm_delete(&self) {
        let st = self.app_state.0;
        let Some(target) = st.delete_target.get_untracked() else {
            return;
        };

        let api = st.api.get_untracked();
        let this = *self;
        spawn_local(async move {
            let result = api.delete_note(&target.id).await;
            this.apply_delete(target, result);
        });
    }

    pub(crate) fn apply_delete(&self, target: Note, result: ApiResult<()>) {
        let st = self.app_state.0;
        // The prompt dismisses regardless of outcome; no retry loop.
        st.delete_target.set(None);

        match result {
            Ok(()) => {
                let mut notes = st.notes.get_untracked();
                let removed_index = notes.iter().position(|n| n.id == target.id);
                if let Some(idx) = removed_index {
                    notes.remove(idx);
                }

                let was_selected =
                    st.selected_id.get_untracked().as_deref() == Some(target.id.as_str());
                if was_selected {
                    st.selected_id
                        .set(selection_after_remove(&notes, removed_index.unwrap_or(0)));
                }

                st.notes.set(notes);
                st.mode.set(EditorMode::Viewing);
            }
            Err(e) => st.notice.set(Some(e.to_string())),
        }
    }

    pub fn dismiss_notice(&self) {
        self.app_state.0.notice.set(None);
    }
}

/// Selection survives a wholesale replacement only if its id is still
/// present; otherwise it falls back to the first note. An empty selection
/// has no identifier to reconcile and stays empty.
fn reconcile_selection(notes: &[Note], selected: Option<&str>) -> Option<String> {
    let Some(id) = selected else {
        return None;
    };

    if notes.iter().any(|n| n.id == id) {
        Some(id.to_string())
    } else {
        notes.first().map(|n| n.id.clone())
    }
}

/// After removing the selected entry, select the one that followed it in the
/// prior order, else the last remaining entry, else nothing.
fn selection_after_remove(notes_after: &[Note], removed_index: usize) -> Option<String> {
    if notes_after.is_empty() {
        return None;
    }
    let idx = removed_index.min(notes_after.len() - 1);
    Some(notes_after[idx].id.clone())
}

/// Replace the entry with the same id. A note updated while absent locally
/// (raced refresh) is re-inserted at the front rather than dropped.
fn replace_note(notes: &mut Vec<Note>, updated: Note) {
    match notes.iter_mut().find(|n| n.id == updated.id) {
        Some(slot) => *slot = updated,
        None => notes.insert(0, updated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiErrorKind, NotesApi};
    use crate::state::{AppState, Theme};

    fn note(id: &str, title: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn harness(notes: Vec<Note>) -> (AppState, NotesController) {
        let st = AppState::with_api(
            NotesApi::new("http://localhost:3001".to_string()),
            Theme::Light,
        );
        st.notes.set(notes);
        let controller = NotesController::new(AppContext(st));
        (st, controller)
    }

    fn network_error() -> ApiError {
        ApiError {
            kind: ApiErrorKind::Network,
            status: None,
            message: "error sending request".to_string(),
        }
    }

    #[test]
    fn last_select_wins() {
        let (st, c) = harness(vec![note("1", "a", ""), note("2", "b", ""), note("3", "c", "")]);

        c.select("1".to_string());
        c.select("3".to_string());
        c.select("2".to_string());

        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("2"));
        assert_eq!(st.mode.get_untracked(), EditorMode::Viewing);
    }

    #[test]
    fn select_exits_editing_mode() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        c.begin_create();
        assert!(st.mode.get_untracked().is_editing());

        c.select("1".to_string());
        assert_eq!(st.mode.get_untracked(), EditorMode::Viewing);
    }

    #[test]
    fn refresh_replaces_collection_and_keeps_present_selection() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));
        st.loading.set(true);

        c.apply_refresh(Ok(vec![note("1", "a2", ""), note("2", "b", "")]));

        assert_eq!(st.notes.get_untracked().len(), 2);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
        assert!(!st.loading.get_untracked());
        assert!(st.error.get_untracked().is_none());
    }

    #[test]
    fn refresh_reassigns_missing_selection_to_first() {
        let (st, c) = harness(vec![note("1", "a", ""), note("2", "b", "")]);
        st.selected_id.set(Some("2".to_string()));

        c.apply_refresh(Ok(vec![note("3", "c", ""), note("4", "d", "")]));

        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("3"));
    }

    #[test]
    fn refresh_to_empty_collection_clears_selection() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));

        c.apply_refresh(Ok(vec![]));

        assert!(st.selected_id.get_untracked().is_none());
        assert!(st.notes.get_untracked().is_empty());
    }

    #[test]
    fn refresh_with_no_selection_selects_nothing() {
        let (st, c) = harness(vec![]);

        c.apply_refresh(Ok(vec![note("1", "a", "")]));

        assert!(st.selected_id.get_untracked().is_none());
    }

    #[test]
    fn refresh_failure_keeps_stale_collection() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));
        st.loading.set(true);

        c.apply_refresh(Err(network_error()));

        assert_eq!(st.notes.get_untracked(), vec![note("1", "a", "")]);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
        assert!(st.error.get_untracked().is_some());
        assert!(!st.loading.get_untracked());
    }

    #[test]
    fn refresh_success_clears_previous_banner() {
        let (st, c) = harness(vec![]);
        st.error.set(Some("API error 500: boom".to_string()));

        c.apply_refresh(Ok(vec![note("1", "a", "")]));

        assert!(st.error.get_untracked().is_none());
    }

    #[test]
    fn create_save_prepends_and_selects_new_note() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        c.begin_create();
        st.saving.set(true);

        c.apply_create(Ok(note("9", "A", "B")));

        let notes = st.notes.get_untracked();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], note("9", "A", "B"));
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("9"));
        assert_eq!(st.mode.get_untracked(), EditorMode::Viewing);
        assert!(!st.saving.get_untracked());
    }

    #[test]
    fn edit_save_replaces_matching_entry_only() {
        let (st, c) = harness(vec![note("1", "a", "x"), note("2", "b", "y")]);
        c.begin_edit(note("1", "a", "x"));
        st.saving.set(true);

        c.apply_update(Ok(note("1", "a2", "x2")));

        let notes = st.notes.get_untracked();
        assert_eq!(notes[0], note("1", "a2", "x2"));
        assert_eq!(notes[1], note("2", "b", "y"));
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
        assert_eq!(st.mode.get_untracked(), EditorMode::Viewing);
        assert!(!st.saving.get_untracked());
    }

    #[test]
    fn save_failure_preserves_editing_state() {
        let (st, c) = harness(vec![]);
        c.begin_create();
        st.saving.set(true);

        c.apply_create(Err(network_error()));

        assert_eq!(st.mode.get_untracked(), EditorMode::Creating);
        assert!(st.form_error.get_untracked().is_some());
        assert!(st.notes.get_untracked().is_empty());
        assert!(!st.saving.get_untracked());
    }

    #[test]
    fn update_failure_preserves_editing_state() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        c.begin_edit(note("1", "a", ""));
        st.saving.set(true);

        c.apply_update(Err(network_error()));

        assert_eq!(st.mode.get_untracked(), EditorMode::Editing(note("1", "a", "")));
        assert!(st.form_error.get_untracked().is_some());
    }

    #[test]
    fn request_then_cancel_delete_changes_nothing() {
        let (st, c) = harness(vec![note("1", "a", ""), note("2", "b", "")]);
        st.selected_id.set(Some("2".to_string()));

        c.request_delete(note("2", "b", ""));
        assert!(st.delete_target.get_untracked().is_some());

        c.cancel_delete();
        assert!(st.delete_target.get_untracked().is_none());
        assert_eq!(st.notes.get_untracked().len(), 2);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("2"));
    }

    #[test]
    fn deleting_selected_tail_note_selects_previous() {
        // Initial [1 Welcome, 2 Second], select 2, delete 2 -> [1], selection 1.
        let (st, c) = harness(vec![note("1", "Welcome", ""), note("2", "Second", "")]);
        c.select("2".to_string());

        c.request_delete(note("2", "Second", ""));
        c.apply_delete(note("2", "Second", ""), Ok(()));

        assert_eq!(st.notes.get_untracked(), vec![note("1", "Welcome", "")]);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
        assert!(st.delete_target.get_untracked().is_none());
    }

    #[test]
    fn deleting_selected_middle_note_selects_next_by_prior_order() {
        let (st, c) = harness(vec![note("1", "a", ""), note("2", "b", ""), note("3", "c", "")]);
        st.selected_id.set(Some("2".to_string()));

        c.apply_delete(note("2", "b", ""), Ok(()));

        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("3"));
    }

    #[test]
    fn deleting_unselected_note_keeps_selection() {
        let (st, c) = harness(vec![note("1", "a", ""), note("2", "b", "")]);
        st.selected_id.set(Some("1".to_string()));

        c.apply_delete(note("2", "b", ""), Ok(()));

        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
        assert_eq!(st.notes.get_untracked(), vec![note("1", "a", "")]);
    }

    #[test]
    fn deleting_last_note_clears_selection() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));

        c.apply_delete(note("1", "a", ""), Ok(()));

        assert!(st.notes.get_untracked().is_empty());
        assert!(st.selected_id.get_untracked().is_none());
    }

    #[test]
    fn delete_failure_raises_notice_and_closes_prompt() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));
        c.request_delete(note("1", "a", ""));

        c.apply_delete(note("1", "a", ""), Err(network_error()));

        assert!(st.delete_target.get_untracked().is_none());
        assert!(st.notice.get_untracked().is_some());
        assert_eq!(st.notes.get_untracked().len(), 1);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
    }

    #[test]
    fn cancel_edit_returns_to_viewing_without_store_contact() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        c.begin_edit(note("1", "a", ""));
        st.form_error.set(Some("API error 500: boom".to_string()));

        c.cancel_edit();

        assert_eq!(st.mode.get_untracked(), EditorMode::Viewing);
        assert!(st.form_error.get_untracked().is_none());
        assert_eq!(st.notes.get_untracked().len(), 1);
    }

    #[test]
    fn begin_create_leaves_selection_untouched() {
        let (st, c) = harness(vec![note("1", "a", "")]);
        st.selected_id.set(Some("1".to_string()));

        c.begin_create();

        assert_eq!(st.mode.get_untracked(), EditorMode::Creating);
        assert_eq!(st.selected_id.get_untracked().as_deref(), Some("1"));
    }

    #[test]
    fn replace_note_reinserts_missing_entry_at_front() {
        let mut notes = vec![note("2", "b", "")];
        replace_note(&mut notes, note("9", "n", ""));
        assert_eq!(notes[0].id, "9");
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn selection_after_remove_picks_follower_then_tail() {
        let after = vec![note("1", "a", ""), note("3", "c", "")];
        assert_eq!(selection_after_remove(&after, 1).as_deref(), Some("3"));
        assert_eq!(selection_after_remove(&after, 2).as_deref(), Some("3"));
        assert_eq!(selection_after_remove(&[], 0), None);
    }
}
