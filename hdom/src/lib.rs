//! A tiny element factory and a render loop that rebuilds the view from
//! scratch on every state change.

// NOTE: needs to be on top because it defines macros used elsewhere.
#[macro_use]
mod strings;

mod app;
mod config;
pub mod dom;
mod error;
pub mod host;
mod html;
pub mod render;
pub mod web;

pub use self::{
    app::{Handle, Merge, Phase, RenderLoop},
    config::Config,
    error::{Error, HostError},
};

use dom::Element;
use host::Host;

/// Mounts `view` with `initial` state at [`Config::mount_selector`] and keeps
/// it running for the rest of the process.
pub fn launch<H, S, V>(host: H, config: &Config, initial: S, view: V) -> Result<(), Error>
where
    H: Host + 'static,
    H::Node: 'static,
    S: 'static,
    V: Fn(&S, &Handle<S>) -> Element + 'static,
{
    RenderLoop::launch(host, config, initial, view)?.detach();
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        dom::{builder::button, Ev, Tag},
        host::MemoryDom,
    };

    fn view(count: &u32, handle: &Handle<u32>) -> Element {
        button().on_click(handle.on_set(count + 1)).and(*count).build()
    }

    #[rstest]
    fn launched_app_keeps_running() {
        let dom = MemoryDom::new();
        let mount = dom.create_mount("app").unwrap();

        launch(dom.clone(), &Config::default(), 0, view).unwrap();

        for _ in 0..2 {
            let button = dom.find_all(mount, Tag::Button).unwrap()[0];
            assert!(dom.dispatch(button, Ev::Click).unwrap());
        }
        assert_eq!(dom.inner_html(mount).unwrap(), "<button>2</button>");
    }

    #[rstest]
    fn launch_without_mount_point() {
        let config = Config::new().with_mount_selector("#nowhere");
        assert_eq!(
            launch(MemoryDom::new(), &config, 0, view),
            Err(Error::MountNotFound("#nowhere".to_string()))
        );
    }
}
