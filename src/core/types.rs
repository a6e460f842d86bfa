use std::fmt;
use std::str::FromStr;

use crate::core::LatticeError;

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Call option payoff profile.
    #[default]
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Maps the `is_put` flag used by calling layers onto a side.
    pub fn from_put_flag(is_put: bool) -> Self {
        if is_put { Self::Put } else { Self::Call }
    }

    pub fn is_put(self) -> bool {
        matches!(self, Self::Put)
    }
}

/// Exercise rights for an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    #[default]
    European,
    /// Exercise at any node up to expiry.
    American,
}

/// Option families priced by the lattice engines.
///
/// European and American share the vanilla terminal payoff; they differ only in
/// whether early exercise is tested during backward induction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionFamily {
    European,
    American,
    /// Cash-or-nothing payoff of a fixed amount.
    Digital,
    /// In-the-money difference raised to an exponent.
    Power,
    /// Call leg at the primary strike plus put leg at the secondary strike.
    Strangle,
}

impl OptionFamily {
    pub const ALL: [OptionFamily; 5] = [
        Self::European,
        Self::American,
        Self::Digital,
        Self::Power,
        Self::Strangle,
    ];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::European => "european",
            Self::American => "american",
            Self::Digital => "digital",
            Self::Power => "power",
            Self::Strangle => "strangle",
        }
    }
}

impl fmt::Display for OptionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionFamily {
    type Err = LatticeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(Self::European),
            "american" => Ok(Self::American),
            "digital" => Ok(Self::Digital),
            "power" => Ok(Self::Power),
            "strangle" => Ok(Self::Strangle),
            other => Err(LatticeError::Configuration(format!(
                "unknown option family `{other}`"
            ))),
        }
    }
}

/// Lattice branching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    Binomial,
    Trinomial,
}

impl TreeKind {
    /// Number of columns needed to hold every node of a tree with `steps` steps.
    #[inline]
    pub fn width(self, steps: usize) -> usize {
        match self {
            Self::Binomial => steps + 1,
            Self::Trinomial => 2 * steps + 1,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binomial => "binomial",
            Self::Trinomial => "trinomial",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeKind {
    type Err = LatticeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "binomial" => Ok(Self::Binomial),
            "trinomial" => Ok(Self::Trinomial),
            other => Err(LatticeError::Configuration(format!(
                "unknown tree kind `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_tags_parse_case_insensitively() {
        for family in OptionFamily::ALL {
            let upper = family.as_str().to_uppercase();
            assert_eq!(upper.parse::<OptionFamily>().unwrap(), family);
            assert_eq!(family.to_string().parse::<OptionFamily>().unwrap(), family);
        }
    }

    #[test]
    fn unknown_family_is_a_configuration_error() {
        let err = "asian".parse::<OptionFamily>().unwrap_err();
        assert!(matches!(err, LatticeError::Configuration(_)));
        assert!(err.to_string().contains("asian"));
    }

    #[test]
    fn tree_width_matches_branching() {
        assert_eq!(TreeKind::Binomial.width(4), 5);
        assert_eq!(TreeKind::Trinomial.width(4), 9);
    }

    #[test]
    fn put_flag_maps_to_side() {
        assert_eq!(OptionType::from_put_flag(true), OptionType::Put);
        assert_eq!(OptionType::from_put_flag(false), OptionType::Call);
        assert_eq!(OptionType::Put.sign(), -1.0);
    }
}
