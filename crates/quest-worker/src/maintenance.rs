//! Fixed maintenance statements. They bypass the write filter because the
//! caller cannot alter them.

/// Idempotent demo dataset: three users, four items, their interactions.
pub const SEED_STATEMENT: &str = "\
MERGE (u1:User {id:'u1'}) SET u1.name='Alice' \
MERGE (u2:User {id:'u2'}) SET u2.name='Bob' \
MERGE (u3:User {id:'u3'}) SET u3.name='Chris' \
MERGE (i1:Item {id:'i1'}) SET i1.name='Graph DB Book', i1.category='book' \
MERGE (i2:Item {id:'i2'}) SET i2.name='Neo4j Mug', i2.category='goods' \
MERGE (i3:Item {id:'i3'}) SET i3.name='Cypher Cheat Sheet', i3.category='doc' \
MERGE (i4:Item {id:'i4'}) SET i4.name='Bouldering Chalk', i4.category='sport' \
WITH 1 AS _ \
MATCH (u1:User {id:'u1'}), (u2:User {id:'u2'}), (u3:User {id:'u3'}) \
MATCH (i1:Item {id:'i1'}), (i2:Item {id:'i2'}), (i3:Item {id:'i3'}), (i4:Item {id:'i4'}) \
MERGE (u1)-[:VIEW]->(i1) \
MERGE (u1)-[:CART]->(i2) \
MERGE (u2)-[:VIEW]->(i1) \
MERGE (u2)-[:BUY]->(i1) \
MERGE (u3)-[:VIEW]->(i2) \
MERGE (u3)-[:VIEW]->(i3) \
MERGE (u3)-[:VIEW]->(i4) \
RETURN 1 AS seeded";

/// Removes every node and relationship.
pub const RESET_STATEMENT: &str = "MATCH (n) DETACH DELETE n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{screen, Rejection};

    #[test]
    fn test_maintenance_statements_would_not_pass_the_filter() {
        assert_eq!(screen(SEED_STATEMENT), Err(Rejection::WriteOrProcedure));
        assert_eq!(screen(RESET_STATEMENT), Err(Rejection::WriteOrProcedure));
    }

    #[test]
    fn test_seed_is_single_line() {
        assert!(!SEED_STATEMENT.contains('\n'));
        assert!(SEED_STATEMENT.ends_with("RETURN 1 AS seeded"));
    }
}
