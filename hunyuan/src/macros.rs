/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// Tool replies take the originating call id in brackets.
///
/// ```rust
/// use hunyuan::{Role, hy_msg};
///
/// let message = hy_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
///
/// let reply = hy_msg!(tool["call-1"] => "28C");
/// assert_eq!(reply.tool_call_id.as_deref(), Some("call-1"));
/// ```
#[macro_export]
macro_rules! hy_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    (tool [$id:expr] => $content:expr $(,)?) => {
        $crate::Message::tool_result($id, $content)
    };
    (tool => $content:expr $(,)?) => {
        compile_error!("tool messages need a call id: tool[\"call-1\"] => ...");
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, assistant, or tool[id]");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use hunyuan::{Role, hy_messages};
///
/// let messages = hy_messages![
///     system => "You are concise.",
///     user => "What is the weather in Shenzhen?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! hy_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident $([$id:expr])? => $content:expr),+ $(,)?) => {
        vec![$($crate::hy_msg!($role $([$id])? => $content)),+]
    };
}

/// Creates a [`Conversation`](crate::Conversation), optionally pinning the model.
///
/// ```rust
/// use hunyuan::hy_conversation;
///
/// let conversation = hy_conversation!(model = "hunyuan-lite"; user => "Hi");
/// assert_eq!(conversation.messages.len(), 1);
/// assert_eq!(conversation.options.model.as_deref(), Some("hunyuan-lite"));
///
/// let plain = hy_conversation!(system => "Be brief.", user => "Hi");
/// assert_eq!(plain.options.model, None);
/// ```
#[macro_export]
macro_rules! hy_conversation {
    (model = $model:expr; $($rest:tt)*) => {
        $crate::Conversation::new($crate::hy_messages![$($rest)*])
            .with_options($crate::ChatOptions::default().with_model($model))
    };
    ($($rest:tt)*) => {
        $crate::Conversation::new($crate::hy_messages![$($rest)*])
    };
}
