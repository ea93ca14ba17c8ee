//! Bubbling UI event kinds.
//!
//! Event delegates only ever subscribe to kinds that bubble upward
//! through the host tree; non-bubbling kinds cannot be delegated from a
//! component's root element and are deliberately absent.
//!
//! # Allow-List
//!
//! [`DEFAULT_EVENT_KINDS`] is the default delegate allow-list. Hosts can
//! narrow or reorder it through the `event_kinds` global-config entry;
//! a delegate then attaches listeners only for kinds that are both in
//! the active allow-list and declared by its handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A bubbling UI event kind.
///
/// The variant set mirrors the event kinds a delegated handler can
/// meaningfully observe from a component's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Primary-button activation.
    Click,
    /// Pointer moved onto an element or one of its descendants.
    MouseOver,
    /// Pointer left an element or one of its descendants.
    MouseOut,
    /// Pointer button pressed.
    MouseDown,
    /// Pointer button released.
    MouseUp,
    /// Pointer entered an element.
    MouseEnter,
    /// Pointer left an element.
    MouseLeave,
    /// Pointer moved within an element.
    MouseMove,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Form submission.
    Submit,
    /// Committed value change on a form control.
    Change,
    /// Context-menu request.
    ContextMenu,
    /// Double click.
    DblClick,
    /// Live value change on a form control.
    Input,
    /// Focus gained (bubbling variant).
    FocusIn,
    /// Focus lost (bubbling variant).
    FocusOut,
}

/// Default delegate allow-list, in dispatch-priority order.
pub const DEFAULT_EVENT_KINDS: &[EventKind] = &[
    EventKind::Click,
    EventKind::MouseOver,
    EventKind::MouseOut,
    EventKind::MouseDown,
    EventKind::MouseUp,
    EventKind::MouseEnter,
    EventKind::MouseLeave,
    EventKind::MouseMove,
    EventKind::KeyDown,
    EventKind::KeyUp,
    EventKind::Submit,
    EventKind::Change,
    EventKind::ContextMenu,
    EventKind::DblClick,
    EventKind::Input,
    EventKind::FocusIn,
    EventKind::FocusOut,
];

/// Error returned when parsing an unrecognized event-kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind: {0}")]
pub struct UnknownEventKind(pub String);

impl trellis_types::ErrorCode for UnknownEventKind {
    fn code(&self) -> &'static str {
        "EVENT_UNKNOWN_KIND"
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

impl EventKind {
    /// Returns the lowercase host-side name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseMove => "mousemove",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Submit => "submit",
            Self::Change => "change",
            Self::ContextMenu => "contextmenu",
            Self::DblClick => "dblclick",
            Self::Input => "input",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DEFAULT_EVENT_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}
