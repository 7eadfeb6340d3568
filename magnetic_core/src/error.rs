// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use core::fmt;

/// Errors from [`Engine::create`](crate::engine::Engine::create).
///
/// Either failure aborts construction: nothing is registered and the host is
/// left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CreateError {
    /// The container reference was missing or not a renderable element.
    InvalidContainer,
    /// The element reference was missing or not a renderable element.
    InvalidElement,
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidContainer => f.write_str("parameter \"root\" should be a valid Element"),
            Self::InvalidElement => f.write_str("parameter \"element\" should be a valid Element"),
        }
    }
}

impl core::error::Error for CreateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_offending_parameter() {
        assert!(CreateError::InvalidContainer.to_string().contains("\"root\""));
        assert!(CreateError::InvalidElement.to_string().contains("\"element\""));
    }
}
