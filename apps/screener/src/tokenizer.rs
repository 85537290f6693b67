//! Shared text tokenizer used by every lexical evaluator (BM25, embedding, JD
//! matching) so they all agree on what counts as a "word" across mixed
//! Latin + CJK resume and job-description text.

/// Lowercases `text` and splits it into a sequence of tokens.
///
/// A token is a maximal run of ASCII letters/digits, or a maximal run of
/// Hiragana, Katakana, or CJK unified ideographs. A small canonicalization
/// table folds common abbreviation variants onto a single canonical token.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_kind: Option<CharKind> = None;

    for ch in lower.chars() {
        match classify(ch) {
            Some(kind) => {
                if current_kind == Some(kind) {
                    current.push(ch);
                } else {
                    flush(&mut current, &mut tokens);
                    current.push(ch);
                    current_kind = Some(kind);
                }
            }
            None => {
                flush(&mut current, &mut tokens);
                current_kind = None;
            }
        }
    }
    flush(&mut current, &mut tokens);

    tokens.into_iter().map(canonicalize).collect()
}

/// Tokenizer idempotence check: tokenizing an already-lowercased, already
/// space-joined token stream reproduces the same tokens.
pub fn retokenize(tokens: &[String]) -> Vec<String> {
    tokenize(&tokens.join(" "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Latin,
    Cjk,
}

fn classify(ch: char) -> Option<CharKind> {
    if ch.is_ascii_alphanumeric() {
        return Some(CharKind::Latin);
    }
    let code = ch as u32;
    let is_hiragana = (0x3041..=0x3096).contains(&code);
    let is_katakana = (0x30A1..=0x30FA).contains(&code) || code == 0x30FC;
    let is_cjk_ideograph = (0x4E00..=0x9FFF).contains(&code);
    if is_hiragana || is_katakana || is_cjk_ideograph {
        Some(CharKind::Cjk)
    } else {
        None
    }
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

fn canonicalize(token: String) -> String {
    match token.as_str() {
        "iac" | "infrastructureascode" => "iac".to_string(),
        "aws" | "amazonwebservices" => "aws".to_string(),
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_latin_words() {
        assert_eq!(tokenize("Terraform AWS"), vec!["terraform", "aws"]);
    }

    #[test]
    fn test_mixed_latin_and_cjk() {
        let tokens = tokenize("日本語レジュメAWS基盤");
        assert_eq!(tokens, vec!["日本語レジュメ", "aws", "基盤"]);
    }

    #[test]
    fn test_canonicalizes_iac_variants() {
        assert_eq!(tokenize("InfrastructureAsCode"), vec!["iac"]);
        assert_eq!(tokenize("IaC"), vec!["iac"]);
    }

    #[test]
    fn test_canonicalizes_aws_variants() {
        assert_eq!(tokenize("AmazonWebServices"), vec!["aws"]);
    }

    #[test]
    fn test_ignores_punctuation() {
        assert_eq!(
            tokenize("Rust, async/await!"),
            vec!["rust", "async", "await"]
        );
    }

    #[test]
    fn test_empty_string_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_idempotent_under_retokenization() {
        let once = tokenize("Site Reliability Engineer — Terraform");
        let twice = retokenize(&once);
        assert_eq!(once, twice);
    }
}
