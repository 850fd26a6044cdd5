// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for database type recognition

use std::sync::Arc;

use sql_governance_dialect::DialectRegistry;
use sql_governance_metadata::{DataSourceMap, DatabaseTypeRecognizer};
use sql_governance_test_utils::{MockDataSource, UrlFixtures, data_source_map};

fn recognizer() -> DatabaseTypeRecognizer {
    DatabaseTypeRecognizer::new(Arc::new(DialectRegistry::new()))
}

#[test]
fn test_empty_set_is_sql92() {
    let data_sources = DataSourceMap::new();

    assert_eq!(recognizer().database_type(data_sources.values()).name(), "SQL92");
}

#[test]
fn test_recognizes_by_url_prefix() {
    let cases = [
        (UrlFixtures::mysql(), "MySQL"),
        ("jdbc:mysqlx://127.0.0.1:33060/ds_0", "MySQL"),
        ("jdbc:mariadb://127.0.0.1:3306/ds_0", "MariaDB"),
        (UrlFixtures::postgresql(), "PostgreSQL"),
        ("jdbc:opengauss://127.0.0.1:5432/ds_0", "openGauss"),
        (UrlFixtures::oracle(), "Oracle"),
        ("jdbc:sqlserver://127.0.0.1:1433;DatabaseName=ds_0", "SQLServer"),
        ("jdbc:h2:mem:ds_0", "H2"),
        (UrlFixtures::unknown(), "SQL92"),
    ];

    for (url, expected) in cases {
        let data_sources = data_source_map([("ds_0", MockDataSource::new(url))]);
        assert_eq!(
            recognizer().database_type(data_sources.values()).name(),
            expected,
            "url: {}",
            url
        );
    }
}

#[test]
fn test_first_match_wins() {
    let data_sources = data_source_map([
        ("ds_0", MockDataSource::new(UrlFixtures::mysql())),
        ("ds_1", MockDataSource::new(UrlFixtures::postgresql())),
    ]);

    assert_eq!(recognizer().database_type(data_sources.values()).name(), "MySQL");
}

#[test]
fn test_recognition_never_connects() {
    let data_source = MockDataSource::new(UrlFixtures::mysql());
    let data_sources = data_source_map([("ds_0", data_source.clone())]);

    recognizer().database_type(data_sources.values());

    assert_eq!(data_source.opened_connections(), 0);
}
