//! Search-engine metadata for the public marketing pages: per-page meta
//! tags, schema.org JSON-LD, `sitemap.xml` and `robots.txt`.
//!
//! All of it is derived from the static page table below plus the site
//! profile in `Config`; nothing is read from the database.

pub mod handlers;
pub mod sitemap;
pub mod structured;

use serde::Serialize;

use crate::config::SiteProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
        }
    }
}

/// One public page of the marketing site.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub slug: &'static str,
    /// Path relative to the site origin.
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub change_freq: ChangeFreq,
    pub priority: f32,
}

pub const PAGES: &[Page] = &[
    Page {
        slug: "home",
        path: "/",
        title: "Staffing and Recruitment Agency",
        description: "Temporary, contract and permanent staffing for employers, and real jobs for candidates. Fast, local and fully compliant.",
        keywords: &["staffing agency", "recruitment agency", "temp agency", "jobs"],
        change_freq: ChangeFreq::Weekly,
        priority: 1.0,
    },
    Page {
        slug: "services",
        path: "/services",
        title: "Staffing Services",
        description: "Temporary staffing, temp-to-perm, contract and direct-hire recruitment across light industrial, warehouse, office and skilled trades.",
        keywords: &["temporary staffing", "temp to perm", "direct hire", "contract staffing"],
        change_freq: ChangeFreq::Monthly,
        priority: 0.9,
    },
    Page {
        slug: "jobs",
        path: "/jobs",
        title: "Current Job Openings",
        description: "Browse open positions with local employers. Apply online in minutes.",
        keywords: &["jobs near me", "job openings", "warehouse jobs", "general labour jobs"],
        change_freq: ChangeFreq::Daily,
        priority: 0.9,
    },
    Page {
        slug: "about",
        path: "/about",
        title: "About Us",
        description: "A locally owned staffing agency connecting reliable people with growing businesses.",
        keywords: &["about", "staffing agency", "our team"],
        change_freq: ChangeFreq::Yearly,
        priority: 0.6,
    },
    Page {
        slug: "contact",
        path: "/contact",
        title: "Contact Us",
        description: "Get in touch about staffing needs or job opportunities. We reply within one business day.",
        keywords: &["contact", "staffing quote", "hire workers"],
        change_freq: ChangeFreq::Yearly,
        priority: 0.7,
    },
    Page {
        slug: "employers",
        path: "/employers",
        title: "For Employers",
        description: "Request workers, post a job and fill shifts fast with pre-screened candidates.",
        keywords: &["hire staff", "request workers", "post a job", "workforce solutions"],
        change_freq: ChangeFreq::Monthly,
        priority: 0.8,
    },
    Page {
        slug: "candidates",
        path: "/candidates",
        title: "For Job Seekers",
        description: "Find your next job with free career support, resume help and interview coaching.",
        keywords: &["find a job", "job seekers", "career support"],
        change_freq: ChangeFreq::Monthly,
        priority: 0.8,
    },
    Page {
        slug: "interview-prep",
        path: "/interview-prep",
        title: "Interview Preparation",
        description: "Practise common interview questions and get instant feedback on your answers.",
        keywords: &["interview questions", "interview practice", "interview tips"],
        change_freq: ChangeFreq::Monthly,
        priority: 0.7,
    },
    Page {
        slug: "resume-tools",
        path: "/resume-tools",
        title: "Free Resume Tools",
        description: "Improve your resume with AI-assisted rewriting and an instant resume score.",
        keywords: &["resume builder", "resume review", "resume score"],
        change_freq: ChangeFreq::Monthly,
        priority: 0.7,
    },
    Page {
        slug: "privacy",
        path: "/privacy",
        title: "Privacy Policy",
        description: "How we collect, use and protect your personal information.",
        keywords: &["privacy policy"],
        change_freq: ChangeFreq::Yearly,
        priority: 0.3,
    },
];

pub fn find_page(slug: &str) -> Option<&'static Page> {
    PAGES.iter().find(|p| p.slug == slug)
}

pub fn absolute_url(site_url: &str, path: &str) -> String {
    if path == "/" {
        format!("{site_url}/")
    } else {
        format!("{site_url}{path}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub og_type: &'static str,
    pub site_name: String,
    pub locale: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub slug: &'static str,
    pub title: String,
    pub description: &'static str,
    pub keywords: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
}

/// Meta tags for one page; `None` for an unknown slug.
pub fn page_meta(slug: &str, site_url: &str, site: &SiteProfile) -> Option<PageMeta> {
    let page = find_page(slug)?;
    let title = if page.slug == "home" {
        format!("{} | {} in {}", site.name, page.title, site.city)
    } else {
        format!("{} | {}", page.title, site.name)
    };
    let canonical = absolute_url(site_url, page.path);

    Some(PageMeta {
        slug: page.slug,
        open_graph: OpenGraph {
            title: title.clone(),
            description: page.description.to_string(),
            url: canonical.clone(),
            og_type: if page.slug == "home" { "website" } else { "article" },
            site_name: site.name.clone(),
            locale: "en_CA",
        },
        title,
        description: page.description,
        keywords: page.keywords.join(", "),
        canonical,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{site, SITE_URL};
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_page_slugs_and_paths_are_unique() {
        let slugs: HashSet<_> = PAGES.iter().map(|p| p.slug).collect();
        let paths: HashSet<_> = PAGES.iter().map(|p| p.path).collect();
        assert_eq!(slugs.len(), PAGES.len());
        assert_eq!(paths.len(), PAGES.len());
    }

    #[test]
    fn test_every_listed_page_has_meta() {
        for slug in [
            "home", "services", "jobs", "about", "contact", "employers", "candidates",
            "interview-prep", "resume-tools", "privacy",
        ] {
            assert!(page_meta(slug, SITE_URL, &site()).is_some(), "missing {slug}");
        }
        assert_eq!(PAGES.len(), 10);
    }

    #[test]
    fn test_unknown_slug() {
        assert!(page_meta("careers", SITE_URL, &site()).is_none());
    }

    #[test]
    fn test_home_meta() {
        let meta = page_meta("home", SITE_URL, &site()).unwrap();
        assert_eq!(meta.title, "Example Staffing | Staffing and Recruitment Agency in Toronto");
        assert_eq!(meta.canonical, "https://www.example-staffing.ca/");
        assert_eq!(meta.open_graph.og_type, "website");
    }

    #[test]
    fn test_inner_page_meta() {
        let meta = page_meta("resume-tools", SITE_URL, &site()).unwrap();
        assert_eq!(meta.title, "Free Resume Tools | Example Staffing");
        assert_eq!(meta.canonical, "https://www.example-staffing.ca/resume-tools");
        assert_eq!(meta.keywords, "resume builder, resume review, resume score");
        assert_eq!(meta.open_graph.url, meta.canonical);
    }
}
