//! schema.org JSON-LD blobs.

use serde_json::{json, Value};

use crate::config::SiteProfile;
use crate::models::job::JobPosting;
use crate::seo::absolute_url;

/// Organization markup for the site header, as an `EmploymentAgency`.
pub fn organization_json_ld(site_url: &str, site: &SiteProfile) -> Value {
    let mut org = json!({
        "@context": "https://schema.org",
        "@type": "EmploymentAgency",
        "name": site.name,
        "url": absolute_url(site_url, "/"),
        "email": site.email,
        "address": {
            "@type": "PostalAddress",
            "addressLocality": site.city,
            "addressRegion": site.region,
            "addressCountry": site.country,
        },
        "areaServed": {
            "@type": "City",
            "name": site.city,
        },
    });
    if !site.phone.is_empty() {
        org["telephone"] = json!(site.phone);
    }
    org
}

/// Maps stored employment types to schema.org `employmentType` values.
fn schema_employment_type(employment_type: &str) -> Value {
    match employment_type {
        "full_time" => json!("FULL_TIME"),
        "part_time" => json!("PART_TIME"),
        "contract" => json!("CONTRACTOR"),
        "temporary" => json!("TEMPORARY"),
        "temp_to_perm" => json!(["TEMPORARY", "FULL_TIME"]),
        _ => json!("OTHER"),
    }
}

/// Google-for-Jobs compatible `JobPosting` markup.
pub fn job_posting_json_ld(posting: &JobPosting, site_url: &str, site: &SiteProfile) -> Value {
    let description = match &posting.requirements {
        Some(req) if !req.trim().is_empty() => {
            format!("{}\n\nRequirements:\n{}", posting.description, req)
        }
        _ => posting.description.clone(),
    };

    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "JobPosting",
        "title": posting.title,
        "description": description,
        "identifier": {
            "@type": "PropertyValue",
            "name": site.name,
            "value": posting.id.to_string(),
        },
        "datePosted": posting.updated_at.format("%Y-%m-%d").to_string(),
        "employmentType": schema_employment_type(&posting.employment_type),
        "hiringOrganization": {
            "@type": "Organization",
            "name": posting.company_name,
        },
        "jobLocation": {
            "@type": "Place",
            "address": {
                "@type": "PostalAddress",
                "addressLocality": posting.location,
                "addressRegion": site.region,
                "addressCountry": site.country,
            },
        },
        "url": absolute_url(site_url, &format!("/jobs/{}", posting.id)),
    });
    if let Some(salary) = posting.salary_range.as_deref().filter(|s| !s.trim().is_empty()) {
        ld["estimatedSalary"] = json!(salary);
    }
    ld
}
