use quest_core::{columns, MatchRule, MockCatalog};

use crate::cli::args::MockArgs;
use crate::cli::table;
use crate::exit_codes;

pub fn run(args: MockArgs) -> anyhow::Result<i32> {
    let catalog = MockCatalog::builtin();
    let Some(entry) = catalog.lookup(&args.cypher) else {
        println!("no mock entry for this query");
        return Ok(exit_codes::NO_MATCH);
    };

    println!("rule: {}", describe(&entry.rule));
    println!("key:  {}", entry.key);
    let rows = entry.rows();
    print!("{}", table::render(&columns(&rows), &rows));
    Ok(exit_codes::SUCCESS)
}

fn describe(rule: &MatchRule) -> String {
    match rule {
        MatchRule::Exact => "exact".to_string(),
        MatchRule::Heuristic(name) => format!("heuristic ({name})"),
        MatchRule::Generic => "generic node fallback".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_rules() {
        assert_eq!(describe(&MatchRule::Exact), "exact");
        assert_eq!(describe(&MatchRule::Heuristic("users")), "heuristic (users)");
        assert_eq!(describe(&MatchRule::Generic), "generic node fallback");
    }
}
