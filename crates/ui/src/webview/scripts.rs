/// Also holds a `beforeunload` guard for the lifetime of the attempt.
pub(super) fn visibility_monitor_script() -> &'static str {
    r#"(function() {
        const previous = window.__examVisibilityMonitor;
        if (previous) {
            document.removeEventListener("visibilitychange", previous.hidden);
            window.removeEventListener("beforeunload", previous.unload);
        }
        const state = {
            hidden: () => {
                if (document.hidden) dioxus.send({ kind: "visibility-hidden" });
            },
            unload: (event) => {
                event.preventDefault();
                event.returnValue = "";
            },
        };
        window.__examVisibilityMonitor = state;
        document.addEventListener("visibilitychange", state.hidden);
        window.addEventListener("beforeunload", state.unload);
    })();"#
}

pub(super) fn visibility_cleanup_script() -> &'static str {
    r#"(function() {
        const state = window.__examVisibilityMonitor;
        if (state) {
            document.removeEventListener("visibilitychange", state.hidden);
            window.removeEventListener("beforeunload", state.unload);
        }
        window.__examVisibilityMonitor = null;
    })();"#
}

// The desktop window going fullscreen does not raise `fullscreenchange`, so
// the viewport covering the screen counts as fullscreen too.
pub(super) fn fullscreen_monitor_script() -> &'static str {
    r#"(function() {
        const previous = window.__examFullscreenMonitor;
        if (previous) {
            window.removeEventListener("resize", previous.handler);
            document.removeEventListener("fullscreenchange", previous.handler);
        }
        const isFullscreen = () =>
            !!document.fullscreenElement ||
            (window.innerWidth >= screen.width && window.innerHeight >= screen.height);
        const state = { last: isFullscreen(), handler: null };
        state.handler = () => {
            const active = isFullscreen();
            if (active === state.last) return;
            state.last = active;
            dioxus.send({ kind: "fullscreen-changed", active });
        };
        window.__examFullscreenMonitor = state;
        window.addEventListener("resize", state.handler);
        document.addEventListener("fullscreenchange", state.handler);
    })();"#
}

pub(super) fn fullscreen_cleanup_script() -> &'static str {
    r#"(function() {
        const state = window.__examFullscreenMonitor;
        if (state) {
            window.removeEventListener("resize", state.handler);
            document.removeEventListener("fullscreenchange", state.handler);
        }
        window.__examFullscreenMonitor = null;
    })();"#
}
