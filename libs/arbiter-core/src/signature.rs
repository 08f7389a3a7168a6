//! Signature parsing: extract declared parameter names and type annotations
//! from a function header such as
//! `def twoSum(self, nums: List[int], target: int) -> List[int]:`.
//!
//! An unparseable header yields an empty parameter list, never an error;
//! callers treat that as "fuzzing unavailable for this signature".

/// One declared parameter. `ty` is the raw annotation text; an empty string
/// means the parameter was unannotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

/// Parse the parameter list out of a raw definition header.
///
/// Splits on top-level commas only: commas nested inside bracketed generic
/// annotations like `List[List[int]]` are tracked via bracket depth and never
/// treated as separators. The implicit `self`/`this` receiver is dropped.
pub fn parse_params(definition: &str) -> Vec<Param> {
    let Some(open) = definition.find('(') else {
        return Vec::new();
    };
    let Some(close_offset) = definition[open + 1..].find(')') else {
        return Vec::new();
    };
    let args = &definition[open + 1..open + 1 + close_offset];

    split_top_level(args)
        .into_iter()
        .filter_map(|piece| {
            let (name, ty) = match piece.split_once(':') {
                Some((name, ty)) => (name.trim(), ty.trim()),
                None => (piece.trim(), ""),
            };
            if name.is_empty() || name == "self" || name == "this" {
                return None;
            }
            Some(Param {
                name: name.to_string(),
                ty: ty.to_string(),
            })
        })
        .collect()
}

/// Split on commas that are not nested inside brackets or parentheses.
fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for ch in args.chars() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                let piece = current.trim();
                if !piece.is_empty() {
                    parts.push(piece.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let piece = current.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sum_signature() {
        let params =
            parse_params("def twoSum(self, nums: List[int], target: int) -> List[int]:");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], param("nums", "List[int]"));
        assert_eq!(params[1], param("target", "int"));
    }

    #[test]
    fn test_receiver_is_excluded() {
        let params = parse_params("def depth(self) -> int:");
        assert!(params.is_empty());
    }

    #[test]
    fn test_nested_generic_commas_are_not_separators() {
        let params = parse_params(
            "def search(self, grid: List[List[int]], mapping: Dict[str, int], k: int):",
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], param("grid", "List[List[int]]"));
        assert_eq!(params[1], param("mapping", "Dict[str, int]"));
        assert_eq!(params[2], param("k", "int"));
    }

    #[test]
    fn test_unannotated_parameter() {
        let params = parse_params("def f(self, x, y: int):");
        assert_eq!(params[0], param("x", ""));
        assert_eq!(params[1], param("y", "int"));
    }

    #[test]
    fn test_unparseable_signature_yields_empty() {
        assert!(parse_params("not a signature").is_empty());
        assert!(parse_params("def broken(").is_empty());
        assert!(parse_params("").is_empty());
    }

    fn param(name: &str, ty: &str) -> Param {
        Param {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}
