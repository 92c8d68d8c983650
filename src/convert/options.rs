//! Overlay of entity options (`dto`, `paginate`, `skipClient`, ...) on entity skeletons
//!
//! Options are applied in declaration order, so a later declaration for the
//! same entity wins. Compatibility between options is not checked here.

use super::ConversionConfig;
use crate::models::{
    ApplicationType, DtoOption, EntityOption, JdlObject, JsonEntity, ServiceOption,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Apply every JDL option to the entities it selects
pub fn apply_options(
    jdl: &JdlObject,
    entities: &mut BTreeMap<String, JsonEntity>,
    config: &ConversionConfig,
) {
    let entity_names = jdl.entity_names();

    for jdl_option in &jdl.options {
        for entity_name in jdl_option.resolve_entity_names(&entity_names) {
            match entities.get_mut(&entity_name) {
                Some(entity) => apply_option(entity, &jdl_option.option, config),
                None => warn!(
                    "Option '{}' targets undeclared entity '{}', skipping",
                    jdl_option.option.keyword(),
                    entity_name
                ),
            }
        }
    }

    for entity in entities.values_mut() {
        apply_implied_options(entity, config);
    }
}

fn apply_option(entity: &mut JsonEntity, option: &EntityOption, config: &ConversionConfig) {
    debug!("Applying option '{}' to {}", option.keyword(), entity.name);
    match option {
        EntityOption::SkipClient => entity.skip_client = true,
        EntityOption::SkipServer => entity.skip_server = true,
        EntityOption::NoFluentMethod => entity.fluent_methods = false,
        EntityOption::Filter => {
            if config.database_type.is_sql() {
                entity.jpa_metamodel_filtering = true;
            } else {
                warn!(
                    "Filtering is only available with SQL databases, ignoring it for {}",
                    entity.name
                );
            }
        }
        EntityOption::ReadOnly => entity.read_only = true,
        EntityOption::Embedded => entity.embedded = true,
        EntityOption::Dto(value) => entity.dto = *value,
        EntityOption::Service(value) => entity.service = *value,
        EntityOption::Paginate(value) => entity.pagination = *value,
        EntityOption::Search(engine) => entity.search_engine = Some(engine.clone()),
        EntityOption::Microservice(name) => entity.microservice_name = Some(name.clone()),
        EntityOption::AngularSuffix(suffix) => entity.angular_js_suffix = Some(suffix.clone()),
        EntityOption::ClientRootFolder(folder) => {
            entity.client_root_folder = Some(folder.clone())
        }
    }
}

/// Settings that follow from other options or from the application itself
fn apply_implied_options(entity: &mut JsonEntity, config: &ConversionConfig) {
    // MapStruct DTOs are wired through a service layer
    if entity.dto == DtoOption::Mapstruct && entity.service == ServiceOption::No {
        entity.service = ServiceOption::ServiceClass;
    }

    if config.application_type == ApplicationType::Microservice
        && entity.microservice_name.is_none()
    {
        entity.microservice_name = Some(config.application_name.clone());
    }
}
