//! Write-once cell for the fetch intent of a message.

/// A value that can be assigned exactly once.
///
/// A second `set` hands the rejected value back instead of overwriting, so
/// the first assignment stays authoritative for the cell's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOnce<T> {
    value: Option<T>,
}

/// Returned by [`SetOnce::set`] when the cell is already filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadySet<T>(pub T);

impl<T> SetOnce<T> {
    pub const fn new() -> Self {
        Self { value: None }
    }

    pub fn set(&mut self, value: T) -> Result<(), AlreadySet<T>> {
        if self.value.is_some() {
            return Err(AlreadySet(value));
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Default for SetOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}
