use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::periodic;
use crate::conversion::MOLAR_MASS_CONSTANT;

/// A nuclide characterised by atomic number, mass number and isomeric state.
///
/// Isotopes are the leaves of every composition graph. Equality, hashing and
/// ordering only consider the `(Z, A, I)` triple; the relative atomic mass and
/// the display name are carried along but never distinguish two isotopes.
///
/// A mass number of zero marks a *natural surrogate*: a stand-in for an element
/// of natural isotopic abundance, see [`Isotope::natural`].
///
/// # Examples
///
/// ```
/// use isovec::Isotope;
///
/// let u235 = Isotope::new(92, 235, 235.0439301);
/// assert_eq!(u235.name(), "U-235");
/// assert_eq!(u235.neutrons(), 143);
/// assert_eq!(u235.za(), 92235);
/// assert_eq!(u235.zai(), 922350);
/// ```
#[derive(Debug, Clone)]
pub struct Isotope {
    z: u32,
    a: u32,
    i: u32,
    a_r: f64,
    name: String,
}

impl Isotope {
    /// Creates a ground state isotope.
    ///
    /// See [`Isotope::with_state`] for the preconditions.
    pub fn new(z: u32, a: u32, a_r: f64) -> Self {
        Self::with_state(z, a, 0, a_r)
    }

    /// Creates an isotope in isomeric state `i` (0 = ground state).
    ///
    /// # Panics
    ///
    /// In debug builds, if `z` is 0, if `a` is below `z` (a mass number of 0
    /// is accepted as a natural surrogate) or if `a_r` is not a positive
    /// finite number.
    pub fn with_state(z: u32, a: u32, i: u32, a_r: f64) -> Self {
        debug_assert!(z >= 1, "atomic number must be at least 1, got {z}");
        debug_assert!(
            a == 0 || a >= z,
            "mass number {a} is below atomic number {z}"
        );
        debug_assert!(
            a_r.is_finite() && a_r > 0.0,
            "relative atomic mass must be positive, got {a_r}"
        );
        let mut isotope = Self {
            z,
            a,
            i,
            a_r,
            name: String::new(),
        };
        isotope.name = isotope.short_name();
        isotope
    }

    /// Creates the natural surrogate isotope of element `z`.
    ///
    /// The surrogate has mass number 0 and is named `<symbol>-nat`.
    pub fn natural(z: u32, a_r: f64) -> Self {
        let name = format!("{}-nat", periodic::symbol(z).unwrap_or("X"));
        Self {
            z,
            a: 0,
            i: 0,
            a_r,
            name,
        }
    }

    /// Replaces the display name, e.g. `"D"` for deuterium.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Atomic number (number of protons).
    #[inline]
    pub fn z(&self) -> u32 {
        self.z
    }

    /// Mass number (number of nucleons).
    #[inline]
    pub fn a(&self) -> u32 {
        self.a
    }

    /// Isomeric state.
    #[inline]
    pub fn i(&self) -> u32 {
        self.i
    }

    /// Relative atomic mass [-].
    #[inline]
    pub fn a_r(&self) -> f64 {
        self.a_r
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.a_r * MOLAR_MASS_CONSTANT * 1e3
    }

    /// Neutron number. Zero for natural surrogates.
    pub fn neutrons(&self) -> u32 {
        self.a.saturating_sub(self.z)
    }

    pub fn is_natural(&self) -> bool {
        self.a == 0
    }

    /// Symbol of the element this isotope belongs to.
    pub fn symbol(&self) -> &'static str {
        periodic::symbol(self.z).unwrap_or("X")
    }

    /// ZA notation: `Z * 1000 + A`.
    pub fn za(&self) -> u32 {
        self.z * 1000 + self.a
    }

    /// ZAI notation: `Z * 10000 + A * 10 + I`.
    pub fn zai(&self) -> u32 {
        self.z * 10000 + self.a * 10 + self.i
    }

    /// Short name such as `U-235`, `Tc-99m` or `Hf-178m2`.
    pub fn short_name(&self) -> String {
        let mut name = format!("{}-{}", self.symbol(), self.a);
        match self.i {
            0 => {}
            1 => name.push('m'),
            i => name.push_str(&format!("m{i}")),
        }
        name
    }

    /// Name that always states the isomeric state: `U-235g`, `Tc-99m1`.
    pub fn verbose_name(&self) -> String {
        match self.i {
            0 => format!("{}-{}g", self.symbol(), self.a),
            i => format!("{}-{}m{}", self.symbol(), self.a, i),
        }
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.z, self.a, self.i)
    }
}

impl PartialEq for Isotope {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Isotope {}

impl Hash for Isotope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Isotope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Isotope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
