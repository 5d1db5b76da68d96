//! Classification of variant calls and reduction of a variant table to
//! per-sample counts.

use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::utils::formats::table::Column;
use crate::utils::formats::table::Rows;
use crate::utils::formats::table::TableSchema;

//========//
// Schema //
//========//

/// The ALT column of a variant table.
pub const ALT: Column = Column::new(0, "ALT", 3);

/// Layout of the tab-delimited variant table written by the variant caller.
pub static VARIANT_TABLE: TableSchema = TableSchema {
    name: "variant table",
    delimiter: b'\t',
    header_prefix: "REGION\tPOS\tREF",
    header_case_insensitive: false,
    columns: &[ALT],
};

/// IUPAC codes which denote ambiguity between two or more bases. `N` is
/// deliberately absent: it is counted on its own.
pub const IUPAC_AMBIGUITY_CODES: &[char] = &['R', 'Y', 'S', 'W', 'K', 'M', 'B', 'D', 'H', 'V'];

/// The universal ambiguity code.
pub const UNIVERSAL_AMBIGUITY_CODE: char = 'N';

//================//
// Classification //
//================//

/// Which ambiguity category a variant call falls into. Exactly one applies to
/// any ALT value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ambiguity {
    /// The call contains an `N`. Takes precedence over [`Ambiguity::Iupac`].
    N,

    /// The call contains an IUPAC ambiguity code other than `N`.
    Iupac,

    /// The call contains no ambiguity codes.
    Unambiguous,
}

/// The classification of a single ALT value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantClass {
    /// Whether the ALT is longer than a single character.
    pub is_indel: bool,

    /// Whether the ALT contains an `N` (in any case).
    pub is_n: bool,

    /// Whether the ALT contains a non-`N` IUPAC ambiguity code (in any case).
    pub is_iupac_ambiguous: bool,
}

impl VariantClass {
    /// Classifies an ALT value.
    pub fn classify(alt: &str) -> Self {
        // Length is taken before case folding, which can change it (`ß`).
        let is_indel = alt.chars().count() > 1;
        let alt = alt.to_uppercase();

        Self {
            is_indel,
            is_n: alt.contains(UNIVERSAL_AMBIGUITY_CODE),
            is_iupac_ambiguous: alt.contains(IUPAC_AMBIGUITY_CODES),
        }
    }

    /// The ambiguity category of the call. `N` is checked first, so a call
    /// matching both `N` and an IUPAC code is categorized as
    /// [`Ambiguity::N`].
    pub fn ambiguity(&self) -> Ambiguity {
        if self.is_n {
            Ambiguity::N
        } else if self.is_iupac_ambiguous {
            Ambiguity::Iupac
        } else {
            Ambiguity::Unambiguous
        }
    }
}

//========//
// Counts //
//========//

/// Variant counts for a single sample.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCounts {
    /// Total number of counted variants (`total_snv + total_indel`).
    pub total_variants: usize,

    /// Number of single nucleotide variants.
    pub total_snv: usize,

    /// Number of insertions and deletions.
    pub total_indel: usize,

    /// Number of counted variants whose call contains an `N`.
    pub total_n: usize,

    /// Number of counted variants whose call contains some other IUPAC
    /// ambiguity code.
    pub total_iupac: usize,
}

impl VariantCounts {
    /// Counts a single ALT value under the given indel policy. Returns
    /// whether the value was counted.
    pub fn count(&mut self, alt: &str, include_indels: bool) -> bool {
        // An empty call is neither a SNV nor an indel.
        if alt.is_empty() {
            return false;
        }

        let class = VariantClass::classify(alt);

        if class.is_indel {
            if !include_indels {
                return false;
            }
            self.total_indel += 1;
        } else {
            self.total_snv += 1;
        }
        self.total_variants += 1;

        match class.ambiguity() {
            Ambiguity::N => self.total_n += 1,
            Ambiguity::Iupac => self.total_iupac += 1,
            Ambiguity::Unambiguous => {}
        }

        true
    }
}

//=========//
// Reducer //
//=========//

fn reduce<R>(rows: Rows<'_, R>, include_indels: bool) -> Result<VariantCounts>
where
    R: BufRead,
{
    let mut counts = VariantCounts::default();
    let mut skipped = 0usize;

    for result in rows {
        let row = result?;
        if !counts.count(row.get(&ALT), include_indels) {
            skipped += 1;
        }
    }

    debug!(
        "  [*] Counted {} variants ({} SNVs, {} indels, {} N, {} IUPAC); skipped {}.",
        counts.total_variants,
        counts.total_snv,
        counts.total_indel,
        counts.total_n,
        counts.total_iupac,
        skipped
    );

    Ok(counts)
}

/// Reduces a variant table read from `reader` to [`VariantCounts`].
pub fn count_variants<R>(reader: R, include_indels: bool) -> Result<VariantCounts>
where
    R: BufRead,
{
    reduce(VARIANT_TABLE.rows(reader), include_indels)
}

/// Reduces the variant table at `src` to [`VariantCounts`].
pub fn count_variants_from_path<P>(src: P, include_indels: bool) -> Result<VariantCounts>
where
    P: AsRef<Path>,
{
    reduce(VARIANT_TABLE.rows_from_path(src)?, include_indels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    const HEADER: &str = "REGION\tPOS\tREF\tALT\tREF_DP\tREF_RV\tREF_QUAL\tALT_DP\n";

    fn table(alts: &[&str]) -> String {
        let mut data = String::from(HEADER);
        for (i, alt) in alts.iter().enumerate() {
            data.push_str(&format!("MN908947.3\t{}\tC\t{}\t10\t5\t35\t90\n", 100 + i, alt));
        }
        data
    }

    #[test]
    fn test_classify_unambiguous_snv() {
        for alt in ["A", "C", "G", "T", "a", "t"] {
            let class = VariantClass::classify(alt);
            assert!(!class.is_indel);
            assert!(!class.is_n);
            assert!(!class.is_iupac_ambiguous);
            assert_eq!(class.ambiguity(), Ambiguity::Unambiguous);
        }
    }

    #[test]
    fn test_classify_n_in_any_case() {
        for alt in ["N", "n", "+AN", "-nnn"] {
            let class = VariantClass::classify(alt);
            assert!(class.is_n, "{} should be an N call", alt);
            assert_eq!(class.ambiguity(), Ambiguity::N);
        }
    }

    #[test]
    fn test_classify_iupac() {
        for code in ["R", "Y", "S", "W", "K", "M", "B", "D", "H", "V", "r", "y"] {
            let class = VariantClass::classify(code);
            assert!(class.is_iupac_ambiguous, "{} should be ambiguous", code);
            assert!(!class.is_n);
            assert_eq!(class.ambiguity(), Ambiguity::Iupac);
        }
    }

    #[test]
    fn test_n_takes_precedence_over_iupac() {
        let class = VariantClass::classify("+NR");
        assert!(class.is_n);
        assert!(class.is_iupac_ambiguous);
        assert!(class.is_indel);
        assert_eq!(class.ambiguity(), Ambiguity::N);
    }

    #[test]
    fn test_indel_is_by_length() {
        assert!(VariantClass::classify("+AT").is_indel);
        assert!(VariantClass::classify("AT").is_indel);
        assert!(!VariantClass::classify("A").is_indel);
    }

    #[test]
    fn test_indel_length_ignores_case_folding() {
        // Upper-cases to "SS", which must not make it an indel.
        let class = VariantClass::classify("ß");
        assert!(!class.is_indel);
        assert!(class.is_iupac_ambiguous);
    }

    #[test]
    fn test_counts_with_indels() {
        let counts = count_variants(table(&["A", "N", "AT"]).as_bytes(), true).unwrap();
        assert_eq!(
            counts,
            VariantCounts {
                total_variants: 3,
                total_snv: 2,
                total_indel: 1,
                total_n: 1,
                total_iupac: 0,
            }
        );
    }

    #[test]
    fn test_counts_without_indels_skip_multicharacter_calls() {
        let counts = count_variants(table(&["A", "N", "AT", "+NN", "Y"]).as_bytes(), false).unwrap();
        assert_eq!(counts.total_variants, 3);
        assert_eq!(counts.total_snv, 3);
        assert_eq!(counts.total_indel, 0);
        // `+NN` is skipped before classification.
        assert_eq!(counts.total_n, 1);
        assert_eq!(counts.total_iupac, 1);
    }

    #[test]
    fn test_total_is_snv_plus_indel() {
        let alts = ["A", "-CT", "R", "+GGN", "n", "T", "K", "+A"];
        let counts = count_variants(table(&alts).as_bytes(), true).unwrap();
        assert_eq!(counts.total_variants, alts.len());
        assert_eq!(counts.total_variants, counts.total_snv + counts.total_indel);
        assert_eq!(counts.total_n, 2);
        assert_eq!(counts.total_iupac, 2);
    }

    #[test]
    fn test_n_and_iupac_never_both_counted() {
        let counts = count_variants(table(&["+NR", "+RN"]).as_bytes(), true).unwrap();
        assert_eq!(counts.total_n, 2);
        assert_eq!(counts.total_iupac, 0);
    }

    #[test]
    fn test_empty_alt_is_not_counted() {
        let data = format!("{}MN908947.3\t10\tC\t\t10\n", HEADER);
        let counts = count_variants(data.as_bytes(), true).unwrap();
        assert_eq!(counts, VariantCounts::default());
    }

    #[test]
    fn test_header_only_table() {
        let counts = count_variants(HEADER.as_bytes(), true).unwrap();
        assert_eq!(counts, VariantCounts::default());
    }

    #[test]
    fn test_short_row_is_format_error() {
        let data = format!("{}MN908947.3\t10\tC\n", HEADER);
        let err = count_variants(data.as_bytes(), true).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_header_without_alt_column_is_format_error() {
        let data = "REGION\tPOS\tREF\nMN908947.3\t1\tC\tA\t1\n";
        let err = count_variants(data.as_bytes(), true).unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }
}
