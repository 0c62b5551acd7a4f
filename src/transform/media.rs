//! Media reference substitution in forms and models.

use crate::dom::Document;
use crate::error::Result;
use crate::url::MediaMap;

/// Media map key whose URL becomes the form logo.
const FORM_LOGO: &str = "form_logo.png";

/// Rewrite every `src` and every `<a href>` through the media map, and add
/// the form logo when one is supplied.
pub fn resolve_media(dom: &mut Document, media: &MediaMap) -> Result<()> {
    let mut substituted = 0;
    for (selector, attr) in [("[src]", "src"), ("a[href]", "href")] {
        for element in dom.select(dom.document(), selector)? {
            let Some(value) = dom.get_attr(element, attr) else {
                continue;
            };
            let resolved = media.resolve(value);
            if resolved != value {
                dom.set_attr(element, attr, &resolved);
                substituted += 1;
            }
        }
    }

    if let Some(logo) = media.get(FORM_LOGO)
        && let Some(container) = dom.select_first(dom.document(), ".form-logo")?
    {
        let img = dom.create_element_local("img");
        dom.set_attr(img, "alt", "form logo");
        dom.set_attr(img, "src", logo);
        dom.append(container, img);
    }

    log::debug!("media: {substituted} references rewritten");
    Ok(())
}
