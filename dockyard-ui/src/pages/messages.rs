use std::rc::Rc;

use leptos::*;

use crate::message::{GlobalMessage, MessageQueue};

/// Notification strip fed by the shared message queue
#[component]
pub fn GlobalMessages(queue: Rc<MessageQueue>) -> impl IntoView {
    let messages = create_rw_signal(queue.messages());
    queue.watch(move |current| messages.set(current.to_vec()));

    view! {
        <div class="global-messages">
            <For
                each=move || messages.get()
                key=|message: &GlobalMessage| message.id
                children=move |message: GlobalMessage| {
                    let queue = queue.clone();
                    let id = message.id;
                    view! {
                        <div class={format!("toast {}", message.severity.class())}>
                            <div class="toast-message">{message.text}</div>
                            <button class="toast-close" on:click=move |_| queue.dismiss(id)>
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
