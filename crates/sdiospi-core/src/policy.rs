//! Classification policy and decode level
//!
//! Which CMD53 transfers count as bulk data is an empirical rule derived
//! from captures of one device, not something the protocol defines. It is
//! kept in a [`ClassificationPolicy`] so it can be tuned per device, either
//! in code or (with the `std` feature) from a TOML file:
//!
//! ```toml
//! [classification]
//! data_buffers = [0xC214, 0xC310, "0xBF40", 0xC110]
//! bulk_threshold = 32
//! block_size = 512
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::sdio::{BLOCK_SIZE, DATA_BUFFERS};

/// Default count above which a data-buffer access is treated as bulk
pub const DEFAULT_BULK_THRESHOLD: u16 = 32;

/// Rules for classifying CMD53 data accesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    /// Link-level addresses of the device's data buffers
    pub data_buffers: Vec<u32>,
    /// Data-buffer accesses with a count above this are bulk
    pub bulk_threshold: u16,
    /// Bytes per block for block-mode transfers
    pub block_size: u32,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            data_buffers: DATA_BUFFERS.to_vec(),
            bulk_threshold: DEFAULT_BULK_THRESHOLD,
            block_size: BLOCK_SIZE,
        }
    }
}

impl ClassificationPolicy {
    /// Returns true if `address` is one of the known data buffers
    pub fn is_data_buffer(&self, address: u32) -> bool {
        self.data_buffers.contains(&address)
    }

    /// Bulk rule: function 2, or a large access to a known data buffer
    pub fn is_bulk(&self, function: u8, address: u32, count: u16) -> bool {
        function == 2 || (self.is_data_buffer(address) && count > self.bulk_threshold)
    }
}

/// How much address detail summaries include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeLevel {
    /// Link-level addresses only
    Basic,
    /// Resolved bus addresses next to link-level addresses
    #[default]
    Detailed,
}

impl fmt::Display for DecodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeLevel::Basic => write!(f, "basic"),
            DecodeLevel::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for DecodeLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("basic") {
            Ok(DecodeLevel::Basic)
        } else if s.eq_ignore_ascii_case("detailed") {
            Ok(DecodeLevel::Detailed)
        } else {
            Err("expected 'basic' or 'detailed'")
        }
    }
}

impl fmt::Display for ClassificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data buffers:")?;
        for addr in &self.data_buffers {
            write!(f, " 0x{:04X}", addr)?;
        }
        write!(
            f,
            ", bulk threshold: {}, block size: {}",
            self.bulk_threshold, self.block_size
        )
    }
}

#[cfg(feature = "std")]
pub use file::PolicyError;

#[cfg(feature = "std")]
mod file {
    use std::format;
    use std::fs;
    use std::path::Path;
    use std::string::String;
    use std::vec::Vec;

    use super::ClassificationPolicy;
    use crate::sdio::MAX_BLOCK_SIZE;

    /// Errors loading a policy file
    #[derive(Debug, thiserror::Error)]
    pub enum PolicyError {
        /// The file could not be read
        #[error("failed to read policy file: {0}")]
        Io(#[from] std::io::Error),
        /// The file is not valid TOML or has wrong types
        #[error("invalid policy file: {0}")]
        Toml(#[from] toml::de::Error),
        /// A value is out of range
        #[error("invalid policy value: {0}")]
        InvalidValue(String),
    }

    /// Policy file structure
    #[derive(Debug, Default, serde::Deserialize)]
    struct PolicyFile {
        #[serde(default)]
        classification: ClassificationTable,
    }

    /// `[classification]` table; omitted keys keep their defaults
    #[derive(Debug, Default, serde::Deserialize)]
    struct ClassificationTable {
        data_buffers: Option<Vec<HexOrInt>>,
        bulk_threshold: Option<HexOrInt>,
        block_size: Option<HexOrInt>,
    }

    /// A number written as a TOML integer or a `"0x..."` string
    #[derive(Debug, serde::Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u32),
        Str(String),
    }

    impl HexOrInt {
        fn value(&self) -> Result<u32, PolicyError> {
            match self {
                HexOrInt::Int(n) => Ok(*n),
                HexOrInt::Str(s) => parse_number(s).map_err(PolicyError::InvalidValue),
            }
        }
    }

    /// Parse a number that can be hex (0x...) or decimal
    fn parse_number(s: &str) -> Result<u32, String> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex '{}': {}", s, e))
        } else {
            s.parse().map_err(|e| format!("invalid number '{}': {}", s, e))
        }
    }

    impl ClassificationPolicy {
        /// Load a policy from a TOML file
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
            let content = fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        }

        /// Parse a policy from TOML text
        pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
            let file: PolicyFile = toml::from_str(content)?;
            let table = file.classification;
            let mut policy = ClassificationPolicy::default();

            if let Some(buffers) = table.data_buffers {
                policy.data_buffers = buffers
                    .iter()
                    .map(HexOrInt::value)
                    .collect::<Result<_, _>>()?;
            }
            if let Some(threshold) = table.bulk_threshold {
                let value = threshold.value()?;
                policy.bulk_threshold = u16::try_from(value).map_err(|_| {
                    PolicyError::InvalidValue(format!("bulk_threshold {} too large", value))
                })?;
            }
            if let Some(size) = table.block_size {
                let value = size.value()?;
                if value == 0 || value > MAX_BLOCK_SIZE {
                    return Err(PolicyError::InvalidValue(format!(
                        "block_size {} out of range 1..={}",
                        value, MAX_BLOCK_SIZE
                    )));
                }
                policy.block_size = value;
            }

            log::debug!("Loaded classification policy: {}", policy);
            Ok(policy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bulk_rule() {
        let policy = ClassificationPolicy::default();
        assert!(policy.is_bulk(2, 0x1234, 1));
        assert!(policy.is_bulk(1, 0xC214, 33));
        assert!(!policy.is_bulk(1, 0xC214, 32));
        assert!(!policy.is_bulk(1, 0x1234, 400));
        assert!(policy.is_bulk(3, 0xBF40, 100));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ClassificationPolicy {
            data_buffers: alloc::vec![0x8000],
            bulk_threshold: 4,
            block_size: 256,
        };
        assert!(policy.is_bulk(1, 0x8000, 5));
        assert!(!policy.is_bulk(1, 0xC214, 100));
    }

    #[test]
    fn test_decode_level_from_str() {
        assert_eq!("basic".parse(), Ok(DecodeLevel::Basic));
        assert_eq!("Detailed".parse(), Ok(DecodeLevel::Detailed));
        assert!("debug".parse::<DecodeLevel>().is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_toml() {
        let toml = r#"
[classification]
data_buffers = [0xC214, "0x8000", 4096]
bulk_threshold = "0x10"
"#;
        let policy = ClassificationPolicy::from_toml_str(toml).unwrap();
        assert_eq!(policy.data_buffers, alloc::vec![0xC214, 0x8000, 4096]);
        assert_eq!(policy.bulk_threshold, 16);
        assert_eq!(policy.block_size, 512);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_empty_toml_is_default() {
        let policy = ClassificationPolicy::from_toml_str("").unwrap();
        assert_eq!(policy, ClassificationPolicy::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_toml_errors() {
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification]\nblock_size = 0"),
            Err(PolicyError::InvalidValue(_))
        ));
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification]\nblock_size = 0x1000000"),
            Err(PolicyError::InvalidValue(_))
        ));
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification]\nblock_size = 2049"),
            Err(PolicyError::InvalidValue(_))
        ));
        assert_eq!(
            ClassificationPolicy::from_toml_str("[classification]\nblock_size = 2048")
                .unwrap()
                .block_size,
            2048
        );
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification]\nbulk_threshold = 70000"),
            Err(PolicyError::InvalidValue(_))
        ));
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification]\ndata_buffers = [\"0xZZ\"]"),
            Err(PolicyError::InvalidValue(_))
        ));
        assert!(matches!(
            ClassificationPolicy::from_toml_str("[classification"),
            Err(PolicyError::Toml(_))
        ));
    }
}
