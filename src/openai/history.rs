use serde::{Deserialize, Serialize};

/// The model's request to run a named function. `arguments` is the raw JSON text
/// exactly as the model produced it; it is only decoded inside the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallDirective {
    pub name: String,
    pub arguments: String,
}

/// One turn of the conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        function_call: Option<FunctionCallDirective>,
    },
    /// Result of a dispatched function, sent back under that function's name.
    Function {
        name: String,
        content: String,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User { content: content.into() }
    }

    pub fn assistant_text(content: impl Into<String>) -> Self {
        Message::Assistant { content: Some(content.into()), function_call: None }
    }

    pub fn assistant_call(directive: FunctionCallDirective) -> Self {
        Message::Assistant { content: None, function_call: Some(directive) }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
            Message::Function { .. } => "function",
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Message::User { content } | Message::Function { content, .. } => Some(content),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// The function-call directive, if this is an assistant message carrying one.
    pub fn function_call(&self) -> Option<&FunctionCallDirective> {
        match self {
            Message::Assistant { function_call, .. } => function_call.as_ref(),
            _ => None,
        }
    }
}

/// Ordered conversation replayed verbatim to the model.
///
/// Invariant: every `Function` message directly follows an assistant message whose
/// directive has the same name. The only way to add one is
/// [`Conversation::append_function_exchange`], which pushes both together.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create empty history.
    pub fn new() -> Self { Self { messages: Vec::new() } }

    /// Conversation holding a single user turn.
    pub fn with_user(content: impl Into<String>) -> Self {
        let mut c = Self::new();
        c.add_user(content);
        c
    }

    pub fn len(&self) -> usize { self.messages.len() }
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }
    pub fn as_slice(&self) -> &[Message] { &self.messages }
    pub fn iter(&self) -> std::slice::Iter<'_, Message> { self.messages.iter() }
    pub fn last(&self) -> Option<&Message> { self.messages.last() }
    pub fn into_vec(self) -> Vec<Message> { self.messages }

    /// Add user message.
    pub fn add_user(&mut self, content: impl Into<String>) -> &mut Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Add assistant message (text only).
    pub fn add_assistant(&mut self, content: impl Into<String>) -> &mut Self {
        self.messages.push(Message::assistant_text(content));
        self
    }

    /// Append the assistant's directive (content dropped) followed by the function
    /// result under the same name. Existing messages are left untouched.
    pub fn append_function_exchange(
        &mut self,
        directive: &FunctionCallDirective,
        output: impl Into<String>,
    ) -> &mut Self {
        self.messages.push(Message::assistant_call(directive.clone()));
        self.messages.push(Message::Function {
            name: directive.name.clone(),
            content: output.into(),
        });
        self
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;
    fn into_iter(self) -> Self::IntoIter { self.messages.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directive() -> FunctionCallDirective {
        FunctionCallDirective {
            name: "search_courses".into(),
            arguments: r#"{"role":"student"}"#.into(),
        }
    }

    #[test]
    fn build_and_length() {
        let mut h = Conversation::new();
        assert!(h.is_empty());
        h.add_user("hello").add_assistant("hi");
        assert_eq!(h.len(), 2);
        assert_eq!(h.as_slice()[1].role(), "assistant");
    }

    #[test]
    fn function_exchange_adds_two_and_keeps_prefix() {
        let mut h = Conversation::new();
        h.add_user("u1").add_assistant("a1").add_user("u2");
        let before = h.clone();

        h.append_function_exchange(&directive(), "[]");

        assert_eq!(h.len(), before.len() + 2);
        assert_eq!(&h.as_slice()[..before.len()], before.as_slice());
        let call = &h.as_slice()[3];
        assert_eq!(call.content(), None);
        assert_eq!(call.function_call(), Some(&directive()));
        match &h.as_slice()[4] {
            Message::Function { name, content } => {
                assert_eq!(name, "search_courses");
                assert_eq!(content, "[]");
            }
            other => panic!("expected function message, got {other:?}"),
        }
    }

    #[test]
    fn serializes_with_role_tags() {
        let mut h = Conversation::with_user("find");
        h.append_function_exchange(&directive(), "[]");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(
            v,
            json!([
                {"role": "user", "content": "find"},
                {"role": "assistant", "content": null,
                 "function_call": {"name": "search_courses", "arguments": "{\"role\":\"student\"}"}},
                {"role": "function", "name": "search_courses", "content": "[]"}
            ])
        );
    }
}
