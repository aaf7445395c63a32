//! Formula preprocessing for Rhai evaluation.
//!
//! Before an emitted formula can be evaluated by Rhai, the spreadsheet
//! dialect must be rewritten:
//!
//! - `$B$1` absolute markers are stripped (`B1`)
//! - blank guards `B4<>""` become `VALUE(1, 3) != ""`
//! - remaining `<>` comparisons become `!=`
//! - range functions `SUM(B4:E4)` become `SUM_RANGE(1, 3, 4, 3)` (col/row)
//! - remaining cell references `B5` become `CELL(1, 4)`
//!
//! References inside string literals are left untouched.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Rewrite an emitted formula into an evaluatable Rhai expression.
pub fn preprocess_formula(formula: &str) -> String {
    let script = formula.replace('$', "");
    let script = rewrite_blank_guards(&script);
    let script = script.replace("<>", "!=");
    let script = rewrite_ranges(&script);
    replace_cell_refs_outside_strings(&script)
}

fn blank_guard_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b([A-Za-z]+)([0-9]+)\s*<>\s*"""#)
            .expect("blank guard regex must compile")
    })
}

/// `B4<>""` needs the raw cell value (blank compares equal to the empty
/// string), not the numeric coercion `CELL` applies.
fn rewrite_blank_guards(script: &str) -> String {
    blank_guard_re()
        .replace_all(script, |caps: &regex::Captures| {
            let cell_ref = format!("{}{}", &caps[1], &caps[2]);
            if let Some(cr) = CellRef::from_str(&cell_ref) {
                format!(r#"VALUE({}, {}) != """#, cr.col, cr.row)
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}

fn rewrite_ranges(script: &str) -> String {
    crate::builtins::range_fn_re()
        .replace_all(script, |caps: &regex::Captures| {
            let Some(rhai_name) = crate::builtins::range_rhai_name(&caps[1]) else {
                return caps[0].to_string();
            };

            if let (Some(start), Some(end)) =
                (CellRef::from_str(&caps[2]), CellRef::from_str(&caps[3]))
            {
                format!(
                    "{}({}, {}, {}, {})",
                    rhai_name, start.col, start.row, end.col, end.row
                )
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}

fn replace_cell_refs_outside_strings(script: &str) -> String {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    let cell_re = CELL_RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z]+)([0-9]+)\b").expect("cell reference regex must compile")
    });

    let replace_cells = |seg: &str| {
        cell_re
            .replace_all(seg, |caps: &regex::Captures| {
                let cell_ref = format!("{}{}", &caps[1], &caps[2]);
                if let Some(cr) = CellRef::from_str(&cell_ref) {
                    format!("CELL({}, {})", cr.col, cr.row)
                } else {
                    caps[0].to_string()
                }
            })
            .to_string()
    };

    let bytes = script.as_bytes();
    let mut out = String::new();
    let mut seg_start = 0;
    let mut in_string = false;
    let mut backslashes = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                backslashes += 1;
                i += 1;
                continue;
            }
            if b == b'"' && backslashes % 2 == 0 {
                out.push_str(&script[seg_start..=i]);
                in_string = false;
                seg_start = i + 1;
            }
            backslashes = 0;
            i += 1;
            continue;
        }

        if b == b'"' {
            out.push_str(&replace_cells(&script[seg_start..i]));
            in_string = true;
            seg_start = i;
            backslashes = 0;
            i += 1;
            continue;
        }

        i += 1;
    }

    if seg_start < script.len() {
        if in_string {
            out.push_str(&script[seg_start..]);
        } else {
            out.push_str(&replace_cells(&script[seg_start..]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_absolute_markers() {
        assert_eq!(preprocess_formula("B4*$B$1"), "CELL(1, 3)*CELL(1, 0)");
    }

    #[test]
    fn test_blank_guard_uses_raw_value() {
        assert_eq!(
            preprocess_formula(r#"B4<>"""#),
            r#"VALUE(1, 3) != """#
        );
    }

    #[test]
    fn test_range_rewrite() {
        assert_eq!(preprocess_formula("SUM(B4:E4)"), "SUM_RANGE(1, 3, 4, 3)");
    }

    #[test]
    fn test_full_allocation_formula() {
        let formula = r#"IF(D4<>"", ROUND(SUM(B4:D4)*$B$1, 0)-SUM(B5:C5), "")"#;
        assert_eq!(
            preprocess_formula(formula),
            r#"IF(VALUE(3, 3) != "", ROUND(SUM_RANGE(1, 3, 3, 3)*CELL(1, 0), 0)-SUM_RANGE(1, 4, 2, 4), "")"#
        );
    }

    #[test]
    fn test_refs_inside_strings_untouched() {
        assert_eq!(
            preprocess_formula(r#"IF(B4<>"", "see A1", "")"#),
            r#"IF(VALUE(1, 3) != "", "see A1", "")"#
        );
    }
}
