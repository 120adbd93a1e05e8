mod aggregate;

use aggregate::*;

use crate::func::Function;

pub const FUNCS: &[Function] = &[SUM, SUM0, COUNT, AVG, MIN, MAX];

/// Looks up an aggregate function by name, ignoring ASCII case.
pub fn find_function(name: &str) -> Option<&'static Function> {
    FUNCS.iter().find(|func| func.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_function() {
        assert_eq!(find_function("SUM").map(|f| f.name), Some("sum"));
        assert_eq!(find_function("$SUM0").map(|f| f.name), Some("$sum0"));
        assert!(find_function("first_value").is_none());
    }
}
