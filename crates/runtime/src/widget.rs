//! Lifecycle of the third-party chat widget.
//!
//! The widget is two script elements appended to a host document: an inline
//! config assignment and the vendor's async embed script. Mounting returns a
//! guard; the scripts are removed when the guard is unmounted or dropped.

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    pub chatbot_id: String,
    pub script_src: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            chatbot_id: "3224383178".to_string(),
            script_src: "https://chatling.ai/js/embed.js".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptElement {
    Inline {
        body: String,
    },
    External {
        src: String,
        is_async: bool,
        attributes: Vec<(String, String)>,
    },
}

pub type ScriptHandle = u64;

/// Somewhere scripts can be attached to, e.g. a document body.
pub trait WidgetHost {
    fn append_script(&mut self, script: ScriptElement) -> ScriptHandle;
    fn remove_script(&mut self, handle: ScriptHandle);
}

impl<H: WidgetHost + ?Sized> WidgetHost for &mut H {
    fn append_script(&mut self, script: ScriptElement) -> ScriptHandle {
        (**self).append_script(script)
    }

    fn remove_script(&mut self, handle: ScriptHandle) {
        (**self).remove_script(handle)
    }
}

/// Host that keeps attached scripts in a list.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    next: ScriptHandle,
    scripts: Vec<(ScriptHandle, ScriptElement)>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> impl Iterator<Item = &ScriptElement> {
        self.scripts.iter().map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl WidgetHost for InMemoryHost {
    fn append_script(&mut self, script: ScriptElement) -> ScriptHandle {
        self.next += 1;
        self.scripts.push((self.next, script));
        self.next
    }

    fn remove_script(&mut self, handle: ScriptHandle) {
        self.scripts.retain(|(h, _)| *h != handle);
    }
}

pub struct ChatWidget {
    config: WidgetConfig,
}

impl ChatWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self { config }
    }

    /// The config script first, then the embed script.
    pub fn scripts(&self) -> [ScriptElement; 2] {
        let config = ScriptElement::Inline {
            body: format!(
                "window.chtlConfig = {{ chatbotId: \"{}\" }}",
                self.config.chatbot_id
            ),
        };
        let embed = ScriptElement::External {
            src: self.config.script_src.clone(),
            is_async: true,
            attributes: vec![
                ("data-id".to_string(), self.config.chatbot_id.clone()),
                ("id".to_string(), "chatling-embed-script".to_string()),
                ("type".to_string(), "text/javascript".to_string()),
            ],
        };
        [config, embed]
    }

    pub fn mount<H: WidgetHost>(&self, mut host: H) -> MountedWidget<H> {
        let handles = self
            .scripts()
            .into_iter()
            .map(|s| host.append_script(s))
            .collect();
        info!(chatbot_id = %self.config.chatbot_id, "chat widget mounted");
        MountedWidget { host: Some(host), handles }
    }
}

/// A mounted widget. Its scripts stay attached until [`unmount`](Self::unmount)
/// or drop.
pub struct MountedWidget<H: WidgetHost> {
    host: Option<H>,
    handles: Vec<ScriptHandle>,
}

impl<H: WidgetHost> MountedWidget<H> {
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Detach the scripts and hand the host back.
    pub fn unmount(mut self) -> Option<H> {
        self.release();
        self.host.take()
    }

    fn release(&mut self) {
        if let Some(host) = self.host.as_mut() {
            for handle in self.handles.drain(..) {
                host.remove_script(handle);
            }
            info!("chat widget unmounted");
        }
    }
}

impl<H: WidgetHost> Drop for MountedWidget<H> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.release();
        }
    }
}
