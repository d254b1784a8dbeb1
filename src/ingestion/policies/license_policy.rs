/// LicensePolicy decides whether a detected license is acceptable
///
/// A license identifier or SPDX expression passes when at least one
/// `OR` alternative consists entirely of OSI-approved licenses.
/// Imprecise names such as `"MIT License"` are matched through the SPDX
/// fuzzy lookup.
pub struct LicensePolicy;

impl LicensePolicy {
    /// Score for the license gate: 1.0 when acceptable, otherwise 0.0
    pub fn score(license: Option<&str>) -> f64 {
        match license {
            Some(license) if Self::is_osi_approved(license) => 1.0,
            _ => 0.0,
        }
    }

    pub fn is_osi_approved(expression: &str) -> bool {
        let cleaned: String = expression
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        let cleaned = cleaned.trim();
        // npm uses `UNLICENSED` for proprietary packages
        if cleaned.is_empty()
            || cleaned.eq_ignore_ascii_case("NOASSERTION")
            || cleaned.eq_ignore_ascii_case("UNLICENSED")
        {
            return false;
        }

        cleaned.split(" OR ").any(|alternative| {
            alternative
                .split(" AND ")
                .all(|term| Self::term_is_osi_approved(term.trim()))
        })
    }

    fn term_is_osi_approved(term: &str) -> bool {
        // `Apache-2.0 WITH LLVM-exception` is judged by its base license
        let base = term.split(" WITH ").next().unwrap_or(term).trim();
        let base = base.strip_suffix('+').unwrap_or(base);
        if base.is_empty() {
            return false;
        }

        if let Some(id) = spdx::license_id(base) {
            return id.is_osi_approved();
        }
        match spdx::imprecise_license_id(base) {
            Some((id, _)) => id.is_osi_approved(),
            None => false,
        }
    }
}
