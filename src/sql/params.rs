//! Values bound to PostgreSQL statements.

use sqlx::postgres::PgArguments;
use sqlx::Arguments;

#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Text(String),
    Date(chrono::NaiveDate),
    BigInt(i64),
}

/// Build sqlx arguments from bound values, in placeholder order.
pub fn to_arguments(params: &[BindValue]) -> Result<PgArguments, sqlx::Error> {
    let mut args = PgArguments::default();
    for p in params {
        let added = match p {
            BindValue::Null => args.add(None::<String>),
            BindValue::Text(s) => args.add(s.clone()),
            BindValue::Date(d) => args.add(*d),
            BindValue::BigInt(n) => args.add(*n),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}
