use crate::application::ports::util::SlugGenerator;
use slug::slugify;

#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        slugify(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_post_titles() {
        let slugger = DefaultSlugGenerator;
        assert_eq!(
            slugger.slugify("Parsing ITCH Messages in C++"),
            "parsing-itch-messages-in-c"
        );
        assert_eq!(slugger.slugify("Dupire's Local Volatility"), "dupire-s-local-volatility");
        assert_eq!(slugger.slugify("???"), "");
    }
}
