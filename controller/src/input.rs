use std::cell::Cell;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("synthesized pointer input is not supported on this platform")]
    Unsupported,

    #[error("failed to dispatch pointer input: {0}")]
    Dispatch(String),
}

/// Pointer state and synthesized button input.
pub trait PointerInput {
    /// Current pointer position in display coordinates.
    fn position(&self) -> Option<[f32; 2]>;

    fn press(&self) -> Result<(), InputError>;
    fn release(&self) -> Result<(), InputError>;
}

/// Pointer for platforms without synthesized input.
#[derive(Debug, Default)]
pub struct UnsupportedPointer {
    pub position: Option<[f32; 2]>,
}

impl PointerInput for UnsupportedPointer {
    fn position(&self) -> Option<[f32; 2]> {
        self.position
    }

    fn press(&self) -> Result<(), InputError> {
        Err(InputError::Unsupported)
    }

    fn release(&self) -> Result<(), InputError> {
        Err(InputError::Unsupported)
    }
}

/// Headless pointer which stays at a fixed position and only logs button events.
#[derive(Debug, Default)]
pub struct LoggingPointer {
    position: Cell<Option<[f32; 2]>>,
    presses: Cell<usize>,
    releases: Cell<usize>,
}

impl LoggingPointer {
    pub fn new(position: Option<[f32; 2]>) -> Self {
        Self {
            position: Cell::new(position),
            ..Default::default()
        }
    }

    pub fn presses(&self) -> usize {
        self.presses.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }
}

impl PointerInput for LoggingPointer {
    fn position(&self) -> Option<[f32; 2]> {
        self.position.get()
    }

    fn press(&self) -> Result<(), InputError> {
        self.presses.set(self.presses.get() + 1);
        log::info!("Pointer press #{}", self.presses.get());
        Ok(())
    }

    fn release(&self) -> Result<(), InputError> {
        self.releases.set(self.releases.get() + 1);
        log::info!("Pointer release #{}", self.releases.get());
        Ok(())
    }
}
