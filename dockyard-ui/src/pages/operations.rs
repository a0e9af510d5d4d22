use std::rc::Rc;

use leptos::*;

use crate::i18n::Catalog;
use crate::operation::{OperateInfo, OperationService, OperationState};

fn state_class(state: OperationState) -> &'static str {
    match state {
        OperationState::Progressing => "op-progressing",
        OperationState::Success => "op-success",
        OperationState::Failure => "op-failure",
    }
}

/// Recent operations, newest first
#[component]
pub fn OperationPanel(operations: Rc<OperationService>) -> impl IntoView {
    let log = create_rw_signal(operations.operations());
    operations.watch(move |current| log.set(current.to_vec()));
    let catalog = Catalog::en_us();

    view! {
        <aside class="operation-panel">
            <div class="panel-header">
                <h3>"Operations"</h3>
                <button class="btn btn-sm" on:click=move |_| operations.clear()>"Clear"</button>
            </div>
            <ul>
                {move || {
                    log.get()
                        .into_iter()
                        .rev()
                        .map(|op: OperateInfo| {
                            let title = format!("{} {}", catalog.lookup(&op.name), op.data.name);
                            view! {
                                <li class={state_class(op.state)}>
                                    <span class="op-name">{title}</span>
                                    <span class="op-time">{op.time_diff.unwrap_or_default()}</span>
                                    {op.message.map(|m| view! { <p class="op-detail">{m}</p> })}
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </aside>
    }
}
