mod common;

use similar_asserts::assert_eq;

use query_engine_sql::sql::ast::Value;

fn names(params: &[(String, Value)]) -> Vec<&str> {
    params.iter().map(|(name, _)| name.as_str()).collect()
}

#[tokio::test]
async fn filtered_page() {
    let (count, fetch) = common::test_translation("filtered_page").await.unwrap();

    insta::assert_snapshot!(&fetch.sql, @"select id, name, age from people where 1=1 and (name LIKE :p1 AND (age>=:p2 AND age<=:p3)) order by 1=1, name ASC, age DESC LIMIT 10 OFFSET 20");
    insta::assert_snapshot!(&count.sql, @"SELECT count(*) FROM (select id, name, age from people where 1=1 and (name LIKE :p1 AND (age>=:p2 AND age<=:p3)) order by 1=1) AS count_source");
    assert_eq!(
        fetch.params,
        vec![
            ("p1".to_string(), Value::from("a%")),
            ("p2".to_string(), Value::Int8(18)),
            ("p3".to_string(), Value::Int8(65)),
        ]
    );
    assert_eq!(count.params, fetch.params);
}

#[tokio::test]
async fn static_parameters() {
    let (count, fetch) = common::test_translation("static_parameters").await.unwrap();

    insta::assert_snapshot!(&fetch.sql, @"select id, name, status from people where tenant = :tenant and region = :region and (status IS NOT NULL OR id IN (:p1, :p2)) order by id");
    assert_eq!(names(&fetch.params), vec!["tenant", "region", "p1", "p2"]);
    assert_eq!(names(&count.params), vec!["tenant", "region", "p1", "p2"]);
    assert_eq!(fetch.params[0].1, Value::from("acme"));
}

#[tokio::test]
async fn unbounded_page() {
    let (_count, fetch) = common::test_translation("unbounded_page").await.unwrap();

    assert_eq!(
        fetch.sql,
        "select id, name, age from people where 1=1  order by 1=1, age ASC"
    );
    assert!(fetch.params.is_empty());
}
