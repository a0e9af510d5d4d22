use std::rc::Rc;

use dockyard_common::paging::DEFAULT_PAGE_SIZE;
use dockyard_common::{GridState, PageDescriptor, Request, SortDescriptor};
use leptos::*;

use crate::confirmation::ConfirmationMessage;
use crate::i18n::Catalog;
use crate::list_request::{ListServices, ListState, RequestListView};
use crate::LeptosSpawner;

fn page_label(state: &ListState) -> String {
    if state.total_count == 0 {
        return "0 requests".to_string();
    }
    let first = u64::from(state.current_page.saturating_sub(1)) * u64::from(state.page_size) + 1;
    let last = (first + state.requests.len() as u64).saturating_sub(1);
    format!("{} - {} of {} requests", first, last, state.total_count)
}

fn last_page(state: &ListState) -> u32 {
    if state.page_size == 0 {
        return 1;
    }
    let pages = state.total_count.div_ceil(u64::from(state.page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[component]
pub fn ListRequest(
    services: ListServices,
    /// Opens the request creation form
    #[prop(optional)]
    on_add: Option<Callback<()>>,
) -> impl IntoView {
    let confirmation = services.confirmation.clone();
    let catalog = Rc::new(Catalog::en_us());
    let view_model = Rc::new(RequestListView::new(services, Rc::new(LeptosSpawner)));

    let state = create_rw_signal(view_model.snapshot());
    view_model.watch(move |snapshot| state.set(snapshot.clone()));
    if let Some(on_add) = on_add {
        view_model.on_add_request(move || on_add.call(()));
    }

    // Unsubscribe on unmount
    {
        let vm = view_model.clone();
        on_cleanup(move || vm.close());
    }

    let (dialog, set_dialog) = create_signal(None::<ConfirmationMessage<Vec<Request>>>);
    let (search, set_search) = create_signal(String::new());

    {
        let vm = view_model.clone();
        spawn_local(async move {
            vm.load_page(GridState::with_page(PageDescriptor::first(DEFAULT_PAGE_SIZE)))
                .await;
        });
    }

    let go_to_page = {
        let vm = view_model.clone();
        move |page: u32| {
            let vm = vm.clone();
            let (current, size) = state.with(|s| (s.current_state.clone().unwrap_or_default(), s.page_size));
            spawn_local(async move {
                vm.load_page(current.at_page(PageDescriptor::for_page(page, size))).await;
            });
        }
    };

    let sort_by_name = {
        let vm = view_model.clone();
        move |_: ev::MouseEvent| {
            let vm = vm.clone();
            let mut current = state.with(|s| s.current_state.clone().unwrap_or_default());
            let reverse = current.sort.as_ref().map_or(false, |sort| sort.by == "name" && !sort.reverse);
            current.sort = Some(SortDescriptor {
                by: "name".to_string(),
                reverse,
            });
            spawn_local(async move { vm.load_page(current).await });
        }
    };

    let on_search = {
        let vm = view_model.clone();
        move |event: ev::Event| {
            let keyword = event_target_value(&event);
            set_search.set(keyword.clone());
            let vm = vm.clone();
            spawn_local(async move { vm.search_changed(&keyword).await });
        }
    };

    let on_refresh = {
        let vm = view_model.clone();
        move |_: ev::MouseEvent| {
            set_search.set(String::new());
            let vm = vm.clone();
            spawn_local(async move { vm.refresh().await });
        }
    };

    let on_delete = {
        let vm = view_model.clone();
        let confirmation = confirmation.clone();
        move |_: ev::MouseEvent| {
            vm.request_deletion(vm.selected());
            set_dialog.set(confirmation.pending());
        }
    };

    let on_confirm = {
        let confirmation = confirmation.clone();
        move |_: ev::MouseEvent| {
            set_dialog.set(None);
            confirmation.confirm();
        }
    };

    let on_cancel = move |_: ev::MouseEvent| {
        set_dialog.set(None);
        confirmation.cancel();
    };

    let toggle_row = {
        let vm = view_model.clone();
        move |request: Request, checked: bool| {
            let mut selected = vm.selected();
            selected.retain(|r| r.request_id != request.request_id);
            if checked {
                selected.push(request);
            }
            vm.select(selected);
        }
    };

    let can_create = {
        let vm = view_model.clone();
        move || vm.can_create_request()
    };
    let can_delete = {
        let vm = view_model.clone();
        move || state.with(|_| vm.can_delete())
    };
    let add_request = {
        let vm = view_model.clone();
        move |_: ev::MouseEvent| vm.add_new_request()
    };

    let go_prev = go_to_page.clone();
    let go_next = go_to_page;

    view! {
        <div class="request-list">
            <div class="page-header">
                <h1>"Requests"</h1>
                <div class="header-actions">
                    <Show when=can_create.clone()>
                        <button class="btn btn-primary" on:click=add_request.clone()>
                            "+ New Request"
                        </button>
                    </Show>
                    <button
                        class="btn btn-danger"
                        disabled=move || !can_delete()
                        on:click=on_delete
                    >"Delete"</button>
                    <input
                        class="search-input"
                        type="search"
                        placeholder="Filter requests"
                        prop:value=search
                        on:change=on_search
                    />
                    <button class="btn btn-secondary" on:click=on_refresh>"Refresh"</button>
                </div>
            </div>

            {move || {
                let snapshot = state.get();
                if snapshot.loading {
                    view! { <p class="loading">"Loading requests..."</p> }.into_view()
                } else if snapshot.requests.is_empty() {
                    view! {
                        <div class="no-data">
                            <p>"No requests found."</p>
                        </div>
                    }.into_view()
                } else {
                    let toggle_row = toggle_row.clone();
                    let sort_by_name = sort_by_name.clone();
                    view! {
                        <table class="request-table">
                            <thead>
                                <tr>
                                    <th></th>
                                    <th class="sortable" on:click=sort_by_name>"Name"</th>
                                    <th>"Owner"</th>
                                    <th>"Created"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {snapshot.requests.iter().cloned().map(|request| {
                                    let checked = snapshot
                                        .selected
                                        .iter()
                                        .any(|r| r.request_id == request.request_id);
                                    let toggle_row = toggle_row.clone();
                                    let row = request.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <input
                                                    type="checkbox"
                                                    prop:checked=checked
                                                    on:change=move |event| toggle_row(row.clone(), event_target_checked(&event))
                                                />
                                            </td>
                                            <td><strong>{request.name.clone()}</strong></td>
                                            <td>{request.owner_name.clone()}</td>
                                            <td>
                                                {request
                                                    .creation_time
                                                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                                    .unwrap_or_else(|| "-".to_string())}
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }
            }}

            <div class="pagination">
                <span>{move || state.with(page_label)}</span>
                <button
                    class="btn btn-sm"
                    disabled=move || state.with(|s| s.current_page <= 1)
                    on:click=move |_| go_prev(state.with(|s| s.current_page.saturating_sub(1).max(1)))
                >"‹"</button>
                <button
                    class="btn btn-sm"
                    disabled=move || state.with(|s| s.current_page >= last_page(s))
                    on:click=move |_| go_next(state.with(|s| s.current_page + 1))
                >"›"</button>
            </div>

            {move || dialog.get().map(|message| {
                let title = catalog.lookup(&message.title);
                let body = catalog.format(&message.message, &message.param);
                let on_confirm = on_confirm.clone();
                let on_cancel = on_cancel.clone();
                view! {
                    <div class="modal">
                        <div class="modal-content">
                            <h2>{title}</h2>
                            <p>{body}</p>
                            <div class="modal-actions">
                                <button class="btn btn-secondary" on:click=on_cancel>"Cancel"</button>
                                <button class="btn btn-danger" on:click=on_confirm>"Delete"</button>
                            </div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(current_page: u32, total_count: u64, rows: usize) -> ListState {
        ListState {
            current_page,
            total_count,
            requests: (0..rows as i64).map(|id| Request::new(id, format!("r{}", id))).collect(),
            ..ListState::default()
        }
    }

    #[test]
    fn test_page_label() {
        assert_eq!(page_label(&state(1, 0, 0)), "0 requests");
        assert_eq!(page_label(&state(1, 31, 15)), "1 - 15 of 31 requests");
        assert_eq!(page_label(&state(3, 31, 1)), "31 - 31 of 31 requests");
    }

    #[test]
    fn test_last_page() {
        assert_eq!(last_page(&state(1, 0, 0)), 1);
        assert_eq!(last_page(&state(1, 30, 15)), 2);
        assert_eq!(last_page(&state(1, 31, 15)), 3);
    }
}
