use actix_web::get;
use actix_web::web::{Json, Path};

use crate::error::Error;

use super::registry::{self, FieldTypeInfo};
use super::FieldType;

#[get("/field-types")]
#[tracing::instrument]
pub async fn get_field_types() -> Json<Vec<FieldTypeInfo>> {
    Json(registry::describe_all())
}

#[get("/field-types/{field_type}")]
#[tracing::instrument]
pub async fn get_field_type(params: Path<String>) -> Result<Json<FieldTypeInfo>, Error> {
    let field_type: FieldType = params.into_inner().parse()?;

    Ok(Json(registry::describe(field_type)))
}
