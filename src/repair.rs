use tracing::warn;

/// Telltale substring of a hallucinated tool call: the upstream model
/// sometimes passes a fragment of the JSON-encoded call itself instead of
/// a bare code string.
const HALLUCINATION_MARKER: &str = "\"code\": \"";

/// Normalize a code argument from the upstream caller.
///
/// When the telltale JSON fragment is present the known corruption shape
/// is undone textually: take everything after the first `"code": "`,
/// strip the leaked JSON closing (one trailing `}`, then one trailing
/// `"`), and turn literal `\n` escape sequences back into newlines. This
/// is best-effort recovery of exactly the observed failure shape, not a
/// JSON parser; anything unrecognized passes through unchanged and will
/// surface as an execution failure instead.
pub fn repair_code_argument(code: &str) -> String {
    let code = code.trim();

    let Some((_, tail)) = code.split_once(HALLUCINATION_MARKER) else {
        return code.to_string();
    };

    warn!("fixing hallucinated code-argument payload");

    let mut repaired = tail.trim();
    repaired = repaired.strip_suffix('}').unwrap_or(repaired).trim_end();
    repaired = repaired.strip_suffix('"').unwrap_or(repaired).trim_end();

    repaired.trim().replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_json_encoded_call_fragment() {
        assert_eq!(
            repair_code_argument("{\"code\": \"print(1+1)\"}"),
            "print(1+1)"
        );
    }

    #[test]
    fn converts_literal_escapes_to_newlines() {
        assert_eq!(
            repair_code_argument("{\"code\": \"import math\\nprint(math.pi)\"}"),
            "import math\nprint(math.pi)"
        );
    }

    #[test]
    fn plain_code_passes_through_trimmed() {
        assert_eq!(repair_code_argument("  print(2+2)\n"), "print(2+2)");
    }

    #[test]
    fn literal_escapes_without_marker_are_left_alone() {
        assert_eq!(repair_code_argument("print('a\\nb')"), "print('a\\nb')");
    }

    #[test]
    fn partial_fragment_without_closing_punctuation() {
        assert_eq!(
            repair_code_argument("\"code\": \"print('x')"),
            "print('x')"
        );
    }
}
