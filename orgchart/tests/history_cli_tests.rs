use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const SEED: &str = "
    CREATE TABLE organograma (id INTEGER PRIMARY KEY, ativo BOOLEAN NOT NULL);
    CREATE TABLE organograma_historico (
        id INTEGER PRIMARY KEY,
        id_organograma INTEGER NOT NULL,
        id_pai INTEGER,
        nome VARCHAR NOT NULL,
        data_inicio DATE NOT NULL
    );
    INSERT INTO organograma VALUES (2, true), (5, true);
    INSERT INTO organograma_historico VALUES
        (10, 2, NULL, 'Dept A', DATE '2019-06-01'),
        (11, 2, NULL, 'Dept B', DATE '2021-01-01'),
        (50, 5, 2, 'Team X', DATE '2020-01-01'),
        (51, 5, 2, 'Team X2', DATE '2022-03-01'),
        (52, 5, NULL, 'Team X0', DATE '2010-01-01');
";

const ENV_OVERRIDES: [&str; 7] = [
    "ORGCHART_DRIVER",
    "ORGCHART_PG_HOST",
    "ORGCHART_PG_PORT",
    "ORGCHART_PG_DATABASE",
    "ORGCHART_PG_USER",
    "ORGCHART_PG_PASSWORD",
    "ORGCHART_DUCKDB_PATH",
];

/// Temp working directory with a seeded DuckDB file and a profile pointing at it.
struct OrgChartTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl OrgChartTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        let db_path = root.join("orgchart.duckdb");

        {
            let conn = duckdb::Connection::open(&db_path)?;
            conn.execute_batch(SEED)?;
        }

        std::fs::write(
            root.join("orgchart.yaml"),
            format!("driver: duckdb\nduckdb:\n  path: \"{}\"\n", db_path.display()),
        )?;

        Ok(Self { _tmp: tmp, root })
    }

    fn orgchart(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("orgchart"));
        cmd.current_dir(&self.root);
        for key in ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_history_lines() -> Result<()> {
    let env = OrgChartTestEnv::new()?;

    let output = env
        .orgchart()
        .args(["history", "--id", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "ID Histórico: 51, Nome Pai: Dept B",
            "ID Histórico: 50, Nome Pai: Dept A",
            "ID Histórico: 52, Nome Pai: ",
        ]
    );
    Ok(())
}

#[test]
fn test_history_json() -> Result<()> {
    let env = OrgChartTestEnv::new()?;

    let output = env
        .orgchart()
        .args(["history", "--id", "5", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows: serde_json::Value = serde_json::from_slice(&output)?;
    let rows = rows.as_array().map(Vec::as_slice).unwrap_or_default();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["id"], 50);
    assert_eq!(rows[1]["data_inicio"], "2020-01-01");
    assert_eq!(rows[1]["nomeOrganogramaPai"], "Dept A");
    assert!(rows[2]["nomeOrganogramaPai"].is_null());
    Ok(())
}

#[test]
fn test_history_unknown_id_prints_nothing() -> Result<()> {
    let env = OrgChartTestEnv::new()?;
    env.orgchart()
        .args(["history", "--id", "999"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_history_without_profile_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("orgchart"));
    cmd.current_dir(tmp.path())
        .args(["history", "--id", "5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("orgchart.yaml"));
    Ok(())
}

#[test]
fn test_sql_subcommand() -> Result<()> {
    let env = OrgChartTestEnv::new()?;

    env.orgchart()
        .args(["sql", "--id", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"WHERE "o"."id" = $1"#))
        .stdout(predicate::str::contains(r#"AS "nomeOrganogramaPai""#))
        .stdout(predicate::str::contains("-- param 1: 5"));

    env.orgchart()
        .args(["sql", "--id", "5", "--dialect", "duckdb"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"WHERE "o"."id" = ?"#));
    Ok(())
}
