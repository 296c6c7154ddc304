//! `sitemap.xml` and `robots.txt` built from the page table.

use crate::email::templates::escape_html;
use crate::seo::{absolute_url, PAGES};

/// Paths crawlers are asked to skip.
pub const DISALLOWED_PATHS: &[&str] = &["/admin", "/client-portal", "/api/"];

/// One `<url>` per entry in `PAGES`, in table order.
pub fn sitemap_xml(site_url: &str) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in PAGES {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_html(&absolute_url(site_url, page.path)),
            page.change_freq.as_str(),
            page.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn robots_txt(site_url: &str) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED_PATHS {
        out.push_str(&format!("Disallow: {path}\n"));
    }
    out.push_str(&format!("\nSitemap: {site_url}/sitemap.xml\n"));
    out
}
