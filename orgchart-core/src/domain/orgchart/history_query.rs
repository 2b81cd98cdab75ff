// orgchart-core/src/domain/orgchart/history_query.rs

use super::model::PARENT_NAME_ALIAS;
use super::schema::{OrgChartSchema, columns};
use crate::domain::error::DomainError;
use crate::domain::query::{
    CompareOp, Correlation, Direction, Expr, Ident, QueryBuilder, Select, col,
};

/// History of one org chart, newest first, each row carrying the name its
/// parent had on the row's start date:
///
/// ```text
/// oh.*, o.ativo,
/// (ohp.nome of parent oh.id_pai whose data_inicio is the latest <= oh.data_inicio)
/// ```
///
/// The parent name is NULL when `id_pai` is NULL or the parent has no
/// history on or before that date.
pub fn history_with_parent_name(
    qb: &QueryBuilder,
    schema: &OrgChartSchema,
    org_chart_id: i64,
) -> Result<Select, DomainError> {
    // MAX(s.data_inicio) over the parent's rows not after the outer row
    let latest_parent_start = qb
        .table(schema.history("s")?)
        .expr(Expr::max(col("s", columns::START_DATE)?))
        .where_correlated(Correlation::eq(
            col("s", columns::ORG_CHART_ID)?,
            col("oh", columns::PARENT_ID)?,
        ))
        .where_correlated(Correlation::new(
            col("s", columns::START_DATE)?,
            CompareOp::LtEq,
            col("oh", columns::START_DATE)?,
        ));

    let parent_name = qb
        .table(schema.history("ohp")?)
        .column(col("ohp", columns::NAME)?)
        .where_correlated(Correlation::eq(
            col("ohp", columns::ORG_CHART_ID)?,
            col("oh", columns::PARENT_ID)?,
        ))
        .where_sub(
            col("ohp", columns::START_DATE)?,
            CompareOp::Eq,
            latest_parent_start,
        )
        // Ties on (id_organograma, data_inicio) would otherwise break the scalar subquery
        .limit(1);

    Ok(qb
        .table(schema.org_chart("o")?)
        .inner_join(
            schema.history("oh")?,
            col("oh", columns::ORG_CHART_ID)?,
            CompareOp::Eq,
            col("o", columns::ID)?,
        )
        .select_all_of(Ident::new("oh")?)
        .column(col("o", columns::ACTIVE)?)
        .select_sub(parent_name, Ident::new(PARENT_NAME_ALIAS)?)
        .where_param(col("o", columns::ID)?, CompareOp::Eq, org_chart_id)
        .order_by(col("oh", columns::START_DATE)?, Direction::Desc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::query::{Dialect, Value};
    use anyhow::Result;

    #[test]
    fn test_history_query_postgres() -> Result<()> {
        let qb = QueryBuilder::new(Dialect::Postgres);
        let select = history_with_parent_name(&qb, &OrgChartSchema::default(), 1068)?;
        let compiled = qb.compile(&select)?;

        insta::assert_snapshot!(compiled.sql, @r#"SELECT "oh".*, "o"."ativo", (SELECT "ohp"."nome" FROM "organograma_historico" AS "ohp" WHERE "ohp"."id_organograma" = "oh"."id_pai" AND "ohp"."data_inicio" = (SELECT MAX("s"."data_inicio") FROM "organograma_historico" AS "s" WHERE "s"."id_organograma" = "oh"."id_pai" AND "s"."data_inicio" <= "oh"."data_inicio") LIMIT 1) AS "nomeOrganogramaPai" FROM "organograma" AS "o" INNER JOIN "organograma_historico" AS "oh" ON "oh"."id_organograma" = "o"."id" WHERE "o"."id" = $1 ORDER BY "oh"."data_inicio" DESC"#);
        assert_eq!(compiled.params, vec![Value::Int(1068)]);
        compiled.verify_syntax()?;
        Ok(())
    }

    #[test]
    fn test_history_query_duckdb_with_schema() -> Result<()> {
        let qb = QueryBuilder::new(Dialect::DuckDb);
        let schema = OrgChartSchema::new(Some("public"), "org", "org_hist")?;
        let compiled = qb.compile(&history_with_parent_name(&qb, &schema, 5)?)?;

        assert!(compiled.sql.starts_with(r#"SELECT "oh".*, "o"."ativo", (SELECT"#));
        assert!(compiled.sql.contains(r#"FROM "public"."org" AS "o" INNER JOIN "public"."org_hist" AS "oh""#));
        assert!(compiled.sql.contains(r#"FROM "public"."org_hist" AS "s""#));
        assert!(compiled.sql.contains(r#"WHERE "o"."id" = ?"#));
        assert!(!compiled.sql.contains('$'));
        compiled.verify_syntax()?;
        Ok(())
    }

    #[test]
    fn test_invalid_table_name_is_rejected() {
        let err = OrgChartSchema::new(None, "organograma; DROP TABLE x", "h").unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(_)));
    }
}
