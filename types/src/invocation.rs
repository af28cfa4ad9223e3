//! Hook payload as delivered on stdin, and the normalized [`Invocation`]
//! the gate decides on.

use std::path::PathBuf;

use serde::Deserialize;

use crate::lenient;

/// Raw pre-tool-use payload.
///
/// Every field is optional so that a partial payload still decodes; unknown
/// fields (`session_id`, `cwd`, `hook_event_name`, ...) are ignored. A field
/// with the wrong shape reads as absent rather than rejecting the payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookPayload {
    #[serde(deserialize_with = "lenient::or_default")]
    pub tool_name: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub transcript_path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub tool_input: ToolInput,
}

/// Arguments of the intercepted edit tool.
///
/// `Write` carries `file_path` + `content`, `Edit` carries `file_path` +
/// `new_string`, `MultiEdit` carries `file_path` + `edits`. Some tools use
/// `path` instead of `file_path`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolInput {
    #[serde(deserialize_with = "lenient::or_default")]
    pub file_path: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub new_string: Option<String>,
    #[serde(deserialize_with = "lenient::seq")]
    pub edits: Vec<EditOp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditOp {
    #[serde(deserialize_with = "lenient::or_default")]
    pub new_string: Option<String>,
}

/// The decision request. Built once per process run and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub tool_name: String,
    pub file_path: Option<String>,
    pub proposed_content: Option<String>,
    pub transcript_path: Option<PathBuf>,
}

impl Invocation {
    /// Target path, if one was supplied and is non-empty.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    #[must_use]
    pub fn proposed_content(&self) -> Option<&str> {
        self.proposed_content.as_deref()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<HookPayload> for Invocation {
    fn from(payload: HookPayload) -> Self {
        let HookPayload {
            tool_name,
            transcript_path,
            tool_input,
        } = payload;

        let file_path = non_empty(tool_input.file_path).or_else(|| non_empty(tool_input.path));

        let proposed_content = non_empty(tool_input.new_string)
            .or_else(|| non_empty(tool_input.content))
            .or_else(|| {
                let joined = tool_input
                    .edits
                    .into_iter()
                    .filter_map(|edit| non_empty(edit.new_string))
                    .collect::<Vec<_>>()
                    .join("\n");
                non_empty(Some(joined))
            });

        Self {
            tool_name: tool_name.unwrap_or_default(),
            file_path,
            proposed_content,
            transcript_path: transcript_path.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}
