use tracing::debug;

use crate::listeners::{ListenerId, ListenerKind, Listeners};

pub const SMALL_BREAKPOINT: u32 = 480;
pub const MEDIUM_BREAKPOINT: u32 = 768;

/// Tracks the terminal width and derives layout breakpoints from it.
///
/// Widths are expressed in pixels: terminal columns times the configured
/// cell width, so the breakpoints match those of a browser layout.
#[derive(Debug, Clone)]
pub struct Viewport {
    cell_width: u32,
    width: u32,
}

impl Viewport {
    pub fn new(cell_width: u32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            width: 0,
        }
    }

    pub fn mount(&mut self, listeners: &mut Listeners, columns: u16) {
        if listeners.register(ListenerKind::Resize, ListenerId::Viewport) {
            self.update(columns);
        }
    }

    pub fn unmount(&mut self, listeners: &mut Listeners) {
        listeners.unregister(ListenerKind::Resize, ListenerId::Viewport);
    }

    pub fn update(&mut self, columns: u16) {
        self.width = u32::from(columns) * self.cell_width;
        debug!(columns, width = self.width, "viewport resized");
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_small_screen_size(&self) -> bool {
        self.width < SMALL_BREAKPOINT
    }

    pub fn is_medium_screen_size(&self) -> bool {
        (SMALL_BREAKPOINT..MEDIUM_BREAKPOINT).contains(&self.width)
    }

    pub fn columns_for_grid(&self) -> usize {
        if self.is_small_screen_size() {
            1
        } else if self.is_medium_screen_size() {
            2
        } else {
            3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn breakpoints_follow_pixel_width() {
        let mut viewport = Viewport::new(8);

        viewport.update(59);
        assert!(viewport.is_small_screen_size());
        assert!(!viewport.is_medium_screen_size());

        viewport.update(60);
        assert_eq!(viewport.width(), 480);
        assert!(!viewport.is_small_screen_size());
        assert!(viewport.is_medium_screen_size());

        viewport.update(96);
        assert!(!viewport.is_small_screen_size());
        assert!(!viewport.is_medium_screen_size());
    }

    #[test]
    fn grid_columns_per_breakpoint() {
        let mut viewport = Viewport::new(8);
        let columns: Vec<usize> = [40, 80, 200]
            .into_iter()
            .map(|cols| {
                viewport.update(cols);
                viewport.columns_for_grid()
            })
            .collect();
        assert_eq!(columns, vec![1, 2, 3]);
    }

    #[test]
    fn mount_reads_initial_size_and_registers_once() {
        let mut listeners = Listeners::new();
        let mut viewport = Viewport::new(8);

        viewport.mount(&mut listeners, 100);
        assert_eq!(viewport.width(), 800);
        assert!(listeners.is_registered(ListenerKind::Resize, ListenerId::Viewport));

        viewport.unmount(&mut listeners);
        assert!(listeners.is_empty());
    }

    #[test]
    fn zero_cell_width_is_clamped() {
        let mut viewport = Viewport::new(0);
        viewport.update(10);
        assert_eq!(viewport.width(), 10);
    }
}
