use super::handlers::{
    auth::{login, register, session},
    grades, health, opt_guide, pages, tracker,
};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Routes added outside (like `/` or the checklist steps) are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(register::register_page, register::register))
        .routes(routes!(login::login_page, login::login))
        .routes(routes!(session::logout))
        .routes(routes!(
            tracker::university_tracker_page,
            tracker::add_application
        ))
        .routes(routes!(tracker::mark_final))
        .routes(routes!(grades::subjects_page, grades::add_grade))
        .routes(routes!(opt_guide::opt_guide_page, opt_guide::check_opt_dates))
        .routes(routes!(pages::dashboard))
        .routes(routes!(pages::skills));

    let tags = [
        ("auth", "Registration, login and logout"),
        ("tracker", "University applications and final choice"),
        ("grades", "Per-semester subject grades"),
        ("opt", "OPT start date window check"),
        ("pages", "Informational pages"),
        ("health", "Service health"),
    ];
    router.get_openapi_mut().tags = Some(
        tags.into_iter()
            .map(|(name, description)| {
                let mut tag = Tag::new(name);
                tag.description = Some(description.to_string());
                tag
            })
            .collect(),
    );

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let primary = env!("CARGO_PKG_AUTHORS").split(';').next().map(str::trim)?;
    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    Some(value.trim()).filter(|trimmed| !trimmed.is_empty())
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    let (name, email) = match author.split_once('<') {
        Some((name, rest)) => (name, Some(rest.trim_end_matches('>'))),
        None => (author, None),
    };
    let name = Some(name.trim()).filter(|name| !name.is_empty());
    let email = email.map(str::trim).filter(|email| !email.is_empty());
    (name, email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Gradpath"));
            assert_eq!(contact.email.as_deref(), Some("team@gradpath.dev"));
        }

        assert_eq!(
            spec.info.license.map(|license| license.name),
            Some("BSD-3-Clause".to_string())
        );
    }

    #[test]
    fn openapi_documents_form_routes() {
        let spec = openapi();
        for path in [
            "/register",
            "/login",
            "/logout",
            "/university-tracker",
            "/mark-final/{id}",
            "/subjects",
            "/opt-guide",
            "/dashboard",
            "/skills",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }

        let tags = spec.tags.unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "tracker"));
    }

    #[test]
    fn parse_author_variants() {
        assert_eq!(
            parse_author("Team Gradpath <team@gradpath.dev>"),
            (Some("Team Gradpath"), Some("team@gradpath.dev"))
        );
        assert_eq!(parse_author("Solo"), (Some("Solo"), None));
        assert_eq!(parse_author(""), (None, None));
    }
}
