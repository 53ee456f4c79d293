use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal input plus the periodic tick, as seen by the main loop.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize,
}
