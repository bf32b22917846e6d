use std::borrow::Cow;

/// XOR filter applied to obfuscated streams of protected files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Obfuscation {
    mask: u8,
}

impl Obfuscation {
    pub const NONE: Self = Self { mask: 0 };

    /// Derive the filter from the password flag and encryption code of the
    /// document properties. The mask is `0xFF - code`, or zero when the code
    /// is zero.
    #[must_use]
    pub const fn from_code(password_flag: u8, code: u8) -> Self {
        if password_flag == 0 || code == 0 {
            return Self::NONE;
        }
        Self { mask: 0xFF - code }
    }

    #[must_use]
    pub const fn mask(self) -> u8 {
        self.mask
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        self.mask != 0
    }

    /// Borrow `data` unchanged when inactive, otherwise return a decoded copy.
    #[must_use]
    pub fn apply(self, data: &[u8]) -> Cow<'_, [u8]> {
        if !self.is_active() {
            return Cow::Borrowed(data);
        }
        Cow::Owned(data.iter().map(|byte| byte ^ self.mask).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_derivation() {
        assert_eq!(Obfuscation::from_code(1, 0x5A).mask(), 0xA5);
        assert_eq!(Obfuscation::from_code(1, 0), Obfuscation::NONE);
        assert_eq!(Obfuscation::from_code(0, 0x5A), Obfuscation::NONE);
    }

    #[test]
    fn test_apply_is_an_involution() {
        let filter = Obfuscation::from_code(3, 0x11);
        let data = b"TBkndTask".to_vec();
        let encoded = filter.apply(&data).into_owned();
        assert_ne!(encoded, data);
        assert_eq!(filter.apply(&encoded).as_ref(), data.as_slice());
        assert!(matches!(Obfuscation::NONE.apply(&data), Cow::Borrowed(_)));
    }
}
