use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader,
    CardTitle, Input, Label, Spinner, Textarea,
};
use crate::models::{Note, NoteDraft};
use crate::state::controller::NotesController;
use crate::state::{AppContext, EditorMode, Theme};
use crate::storage::{save_item, THEME_KEY};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;

/// The single store-backed page: sidebar list + main panel.
#[component]
pub fn NotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<NotesController>();

    let error = app_state.0.error;
    let notice = app_state.0.notice;
    let mode = app_state.0.mode;

    // Initial load.
    Effect::new(move |_| {
        controller.refresh();
    });

    // Escape dismisses the delete prompt. The page lives for the app
    // lifetime, so the handle is parked rather than cleaned up.
    let esc = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && app_state.0.delete_target.get_untracked().is_some() {
            controller.cancel_delete();
        }
    });
    let _esc_handle = StoredValue::new(Some(esc));

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-[1080px] gap-6 px-4 py-6">
                <aside class="flex w-72 shrink-0 flex-col gap-4">
                    <Header />
                    <NoteList />
                </aside>

                <main class="min-w-0 flex-1">
                    <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                        {move || {
                            error.get().map(|e| view! {
                                <Alert class="border-destructive/30 mb-4">
                                    <AlertDescription class="text-destructive">{e}</AlertDescription>
                                </Alert>
                            })
                        }}
                    </Show>

                    <Show when=move || notice.get().is_some() fallback=|| ().into_view()>
                        <Alert class="border-destructive/30 mb-4 flex items-center justify-between gap-2">
                            <AlertDescription class="text-destructive">
                                {move || notice.get().unwrap_or_default()}
                            </AlertDescription>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                on:click=move |_| controller.dismiss_notice()
                            >
                                "Dismiss"
                            </Button>
                        </Alert>
                    </Show>

                    {move || match mode.get() {
                        EditorMode::Viewing => view! { <NoteDetail /> }.into_any(),
                        _ => view! { <NoteForm /> }.into_any(),
                    }}
                </main>
            </div>

            <DeleteModal />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let theme = app_state.0.theme;

    let on_toggle = move |_| {
        let next = theme.get_untracked().toggled();
        theme.set(next);
        save_item(THEME_KEY, next.as_str());
    };

    view! {
        <div class="flex items-center justify-between" role="banner">
            <h1 class="text-base font-semibold">"Simple Notes"</h1>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                on:click=on_toggle
                attr:aria-label=move || {
                    format!("Switch to {} mode", theme.get().toggled().as_str())
                }
            >
                {move || match theme.get() {
                    Theme::Light => "🌙 Dark",
                    Theme::Dark => "☀️ Light",
                }}
            </Button>
        </div>
    }
}

#[component]
fn NoteList() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<NotesController>();

    let notes = app_state.0.notes;
    let selected_id = app_state.0.selected_id;
    let loading = app_state.0.loading;

    view! {
        <div class="flex items-center justify-between">
            <h2 class="text-sm font-semibold">"Notes"</h2>
            <div class="flex items-center gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:disabled=move || loading.get()
                    on:click=move |_| controller.refresh()
                >
                    <span class="inline-flex items-center gap-1.5">
                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if loading.get() { "Refreshing" } else { "Refresh" }}
                    </span>
                </Button>
                <Button
                    size=ButtonSize::Sm
                    attr:aria-label="Create new note"
                    on:click=move |_| controller.begin_create()
                >
                    "+ New"
                </Button>
            </div>
        </div>

        <div class="flex min-h-0 flex-1 flex-col gap-1 overflow-y-auto" role="list" aria-label="Notes list">
            <Show
                when=move || !notes.get().is_empty()
                fallback=move || view! {
                    <div class="rounded-md border px-3 py-4 text-xs text-muted-foreground">
                        {move || if loading.get() {
                            "Loading notes..."
                        } else {
                            "No notes yet. Click “New” to create your first note."
                        }}
                    </div>
                }
            >
                {move || {
                    let selected = selected_id.get();
                    notes
                        .get()
                        .into_iter()
                        .map(|n| {
                            let is_active = selected.as_deref() == Some(n.id.as_str());
                            let id = n.id.clone();
                            let title = display_title(&n);
                            let snippet: String = n.content.chars().take(80).collect();

                            view! {
                                <button
                                    class=move || {
                                        if is_active {
                                            "flex w-full flex-col items-start gap-0.5 rounded-md border border-primary/40 bg-accent px-3 py-2 text-left"
                                        } else {
                                            "flex w-full flex-col items-start gap-0.5 rounded-md border border-transparent px-3 py-2 text-left hover:bg-accent/50"
                                        }
                                    }
                                    role="listitem"
                                    on:click=move |_| controller.select(id.clone())
                                >
                                    <div class="w-full truncate text-sm font-medium">{title}</div>
                                    <div class="w-full truncate text-xs text-muted-foreground">{snippet}</div>
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </Show>
        </div>
    }
}

#[component]
fn NoteDetail() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<NotesController>();

    // Selection is resolved lazily against the collection; a dangling id
    // renders the same empty state as no selection.
    let selected_note = move || {
        let id = app_state.0.selected_id.get()?;
        app_state.0.notes.get().into_iter().find(|n| n.id == id)
    };

    view! {
        <Show
            when=move || selected_note().is_some()
            fallback=|| view! {
                <Card>
                    <CardContent class="text-sm text-muted-foreground">
                        "Select a note from the list or create a new one."
                    </CardContent>
                </Card>
            }
        >
            {move || {
                selected_note().map(|note| {
                    let edit_note = note.clone();
                    let delete_note = note.clone();
                    let title = display_title(&note);
                    let content = if note.content.is_empty() {
                        "No content".to_string()
                    } else {
                        note.content.clone()
                    };

                    view! {
                        <Card>
                            <CardHeader class="w-full flex-row items-center justify-between">
                                <CardTitle>{title}</CardTitle>
                                <div class="flex items-center gap-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| controller.begin_edit(edit_note.clone())
                                    >
                                        "Edit"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Sm
                                        on:click=move |_| controller.request_delete(delete_note.clone())
                                    >
                                        "Delete"
                                    </Button>
                                </div>
                            </CardHeader>
                            <CardContent>
                                <div class="whitespace-pre-wrap text-sm leading-relaxed">{content}</div>
                            </CardContent>
                        </Card>
                    }
                })
            }}
        </Show>
    }
}

#[component]
fn NoteForm() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<NotesController>();

    let saving = app_state.0.saving;
    let form_error = app_state.0.form_error;

    // The panel remounts whenever the editor mode changes, so seeding from
    // the mode at construction mirrors the collection state at entry.
    let (init_title, init_content, is_edit) = match app_state.0.mode.get_untracked() {
        EditorMode::Editing(n) => (n.title, n.content, true),
        _ => (String::new(), String::new(), false),
    };
    let title: RwSignal<String> = RwSignal::new(init_title);
    let content: RwSignal<String> = RwSignal::new(init_content);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        controller.save(NoteDraft {
            title: title.get_untracked(),
            content: content.get_untracked(),
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>{if is_edit { "Edit note" } else { "Create note" }}</CardTitle>
            </CardHeader>

            <CardContent>
                <form class="flex flex-col gap-4" on:submit=on_submit>
                    <div class="flex flex-col gap-2">
                        <Label html_for="title">"Title"</Label>
                        <Input
                            id="title"
                            placeholder="Note title"
                            maxlength=255u32
                            bind_value=title
                        />
                    </div>

                    <div class="flex flex-col gap-2">
                        <Label html_for="content">"Content"</Label>
                        <Textarea
                            id="content"
                            placeholder="Write your note here..."
                            bind_value=content
                        />
                    </div>

                    <Show when=move || form_error.get().is_some() fallback=|| ().into_view()>
                        {move || {
                            form_error.get().map(|e| view! {
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive">{e}</AlertDescription>
                                </Alert>
                            })
                        }}
                    </Show>

                    <div class="flex items-center justify-end gap-2">
                        <Button
                            variant=ButtonVariant::Outline
                            attr:r#type="button"
                            attr:disabled=move || saving.get()
                            on:click=move |_| controller.cancel_edit()
                        >
                            "Cancel"
                        </Button>
                        <Button attr:disabled=move || saving.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || saving.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if saving.get() { "Saving…" } else { "Save" }}
                            </span>
                        </Button>
                    </div>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
fn DeleteModal() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<NotesController>();

    let target = app_state.0.delete_target;

    view! {
        <Show when=move || target.get().is_some() fallback=|| ().into_view()>
            <div class="fixed inset-0 z-50 bg-black/50" on:click=move |_| controller.cancel_delete() />

            <div
                role="dialog"
                aria-modal="true"
                aria-label="Delete confirmation"
                class="fixed left-[50%] top-[50%] z-50 w-full max-w-sm translate-x-[-50%] translate-y-[-50%] rounded-2xl border bg-background p-6 shadow-lg"
            >
                <h3 class="text-lg font-semibold leading-none">"Delete note"</h3>
                <p class="mt-3 text-sm text-muted-foreground">
                    {move || {
                        let title = target
                            .get()
                            .map(|n| display_title(&n))
                            .unwrap_or_default();
                        format!(
                            "Are you sure you want to delete “{title}”? This action cannot be undone."
                        )
                    }}
                </p>
                <div class="mt-5 flex justify-end gap-2">
                    <Button
                        variant=ButtonVariant::Outline
                        on:click=move |_| controller.cancel_delete()
                    >
                        "Cancel"
                    </Button>
                    <Button
                        variant=ButtonVariant::Destructive
                        on:click=move |_| controller.confirm_delete()
                    >
                        "Delete"
                    </Button>
                </div>
            </div>
        </Show>
    }
}

fn display_title(note: &Note) -> String {
    if note.title.is_empty() {
        "Untitled".to_string()
    } else {
        note.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_falls_back_to_untitled() {
        let n = Note {
            id: "1".to_string(),
            title: String::new(),
            content: "c".to_string(),
        };
        assert_eq!(display_title(&n), "Untitled");

        let n = Note {
            id: "1".to_string(),
            title: "T".to_string(),
            content: String::new(),
        };
        assert_eq!(display_title(&n), "T");
    }
}
