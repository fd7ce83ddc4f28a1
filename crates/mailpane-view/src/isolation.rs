//! The isolated-renderer contract.
//!
//! The sanitized document must be displayed in a rendering context that
//! cannot reach the host application's state, credentials or page. This
//! module does not render anything; it describes, as an explicit
//! caller-owned value, what the embedding context may allow beyond the
//! bare minimum. Hosts embedding into a browser-style surface can map
//! [`IsolationPolicy::sandbox_tokens`] directly onto an iframe
//! `sandbox` attribute.

/// Capabilities granted to the isolated rendering context.
///
/// The default grants popups, forms and modals but not script
/// execution: the sanitizer already strips scripts, so enabling them
/// here would only matter for a host that also relaxes sanitization.
/// That trade-off must be opted into explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsolationPolicy {
    /// Allow markup-declared scripts to run inside the boundary.
    pub allow_scripts: bool,
    /// Allow opening new top-level contexts (hyperlink activation).
    pub allow_popups: bool,
    /// Allow form submission from inside the boundary.
    pub allow_forms: bool,
    /// Allow modal dialogs inside the boundary.
    pub allow_modals: bool,
    /// Allow opened popups to leave the sandbox.
    pub allow_popup_escape: bool,
}

impl Default for IsolationPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: false,
            allow_popups: true,
            allow_forms: true,
            allow_modals: true,
            allow_popup_escape: true,
        }
    }
}

impl IsolationPolicy {
    /// Referrer policy the embedding context must apply: the boundary
    /// never leaks the host's location.
    pub const REFERRER_POLICY: &'static str = "no-referrer";

    /// The sandbox allow-list tokens for this policy.
    ///
    /// `allow-same-origin` is never emitted: granting it would let the
    /// content reach the host page, defeating the boundary.
    #[must_use]
    pub fn sandbox_tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_popups {
            tokens.push("allow-popups");
        }
        if self.allow_forms {
            tokens.push("allow-forms");
        }
        if self.allow_modals {
            tokens.push("allow-modals");
        }
        if self.allow_popup_escape {
            tokens.push("allow-popups-to-escape-sandbox");
        }
        tokens
    }

    /// The sandbox tokens joined into one attribute value.
    #[must_use]
    pub fn sandbox_attribute(&self) -> String {
        self.sandbox_tokens().join(" ")
    }
}
