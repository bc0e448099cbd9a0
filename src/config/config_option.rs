use crate::types::err::ConfigError;

/// A configuration value together with its name and range.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }

    /// Sets the value of the option, if within range.
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        if value < self.min || value > self.max {
            return Err(ConfigError::OutOfRange(self.name));
        }
        self.value = value;
        Ok(())
    }
}
