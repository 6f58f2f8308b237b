//! Signature categories and their display configuration

use serde::{Deserialize, Serialize};

/// Approval signature used to complete a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignatureType {
    /// Simple electronic signature
    #[serde(rename = "firmaSemplice")]
    Simple,
    /// Advanced electronic signature
    #[serde(rename = "firmaAvanzata")]
    Advanced,
    /// Advanced signature with one-time password
    #[serde(rename = "firmaAvanzataOTP")]
    AdvancedOtp,
    /// Qualified electronic signature
    #[serde(rename = "firmaQualificata")]
    Qualified,
}

impl SignatureType {
    /// All categories in their fixed display order
    pub const ALL: [SignatureType; 4] = [
        SignatureType::Simple,
        SignatureType::Advanced,
        SignatureType::AdvancedOtp,
        SignatureType::Qualified,
    ];

    /// Parse a signer token as it appears in the source log
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "firmaSemplice" => Some(SignatureType::Simple),
            "firmaAvanzata" => Some(SignatureType::Advanced),
            "firmaAvanzataOTP" => Some(SignatureType::AdvancedOtp),
            "firmaQualificata" => Some(SignatureType::Qualified),
            _ => None,
        }
    }

    /// The signer token used in log messages and report labels
    pub fn token(&self) -> &'static str {
        match self {
            SignatureType::Simple => "firmaSemplice",
            SignatureType::Advanced => "firmaAvanzata",
            SignatureType::AdvancedOtp => "firmaAvanzataOTP",
            SignatureType::Qualified => "firmaQualificata",
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One row of the category configuration: signature, plot color, 1-based area id
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub signature: SignatureType,
    pub color: &'static str,
    pub area_id: usize,
}

/// Ordered table mapping signature categories to colors and display indices.
///
/// The order of the entries is the display order of the plot areas; area ids
/// are 1-based and follow that order.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

/// Fixed 4-color palette, index-aligned with [`SignatureType::ALL`]
const PALETTE: [&str; 4] = ["#1b9e77", "#d95f02", "#7570b3", "#e7298a"];

impl Default for CategoryTable {
    fn default() -> Self {
        let entries = SignatureType::ALL
            .iter()
            .zip(PALETTE.iter())
            .enumerate()
            .map(|(i, (&signature, &color))| CategoryEntry {
                signature,
                color,
                area_id: i + 1,
            })
            .collect();
        Self { entries }
    }
}

impl CategoryTable {
    /// Iterate entries in display order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.iter()
    }

    /// Look up an entry by its 1-based area id
    pub fn by_area_id(&self, area_id: usize) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.area_id == area_id)
    }

    /// Look up the entry for a signature category
    pub fn entry(&self, signature: SignatureType) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.signature == signature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
