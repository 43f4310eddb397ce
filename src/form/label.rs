/// Upper-case the first letter of every whitespace-separated word and
/// lower-case the rest, keeping the original spacing.
pub fn to_title_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            result.push(ch);
            at_word_start = true;
        } else if at_word_start {
            result.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::to_title_case;

    #[test]
    fn capitalises_each_word() {
        assert_eq!(to_title_case("do you have a DOG?"), "Do You Have A Dog?");
        assert_eq!(to_title_case("  e-mail  address"), "  E-mail  Address");
        assert_eq!(to_title_case(""), "");
    }
}
