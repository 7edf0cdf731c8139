use dioxus::desktop::DesktopContext;
use dioxus::prelude::*;
use services::sessions::ports::{CapabilityError, ImmersiveMode};

/// Fullscreen for the desktop window.
pub struct WebviewImmersive {
    desktop: Option<DesktopContext>,
    active: bool,
}

impl WebviewImmersive {
    /// Uses the desktop window of the current scope, when there is one.
    #[must_use]
    pub fn from_context() -> Self {
        Self {
            desktop: try_consume_context::<DesktopContext>(),
            active: false,
        }
    }

    fn desktop(&self) -> Result<&DesktopContext, CapabilityError> {
        self.desktop.as_ref().ok_or_else(|| {
            CapabilityError::EnvironmentCapabilityUnavailable("desktop window".into())
        })
    }
}

impl ImmersiveMode for WebviewImmersive {
    fn enter(&mut self) -> Result<(), CapabilityError> {
        let desktop = self.desktop()?;
        desktop.set_fullscreen(true);
        self.active = desktop.window.fullscreen().is_some();
        if self.active {
            Ok(())
        } else {
            Err(CapabilityError::EnvironmentCapabilityUnavailable(
                "fullscreen".into(),
            ))
        }
    }

    fn exit(&mut self) -> Result<(), CapabilityError> {
        let desktop = self.desktop()?;
        desktop.set_fullscreen(false);
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
