//! Element queries over community page markup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::patterns;
use crate::domain::entities::BackgroundAsset;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("Invalid selector"));
    };
}

selector!(PROFILE_BACKGROUND_SELECTOR, "div.profile_page.has_profile_background");
selector!(ANIMATED_WRAPPER_SELECTOR, "div.profile_animated_background");
selector!(MP4_SOURCE_SELECTOR, r#"source[type="video/mp4"]"#);
selector!(LEGACY_ID_INPUT_SELECTOR, r#"input[value^="STEAM_"]"#);

/// Extracts one kind of background from a background-bearing element.
type BackgroundMatcher = fn(ElementRef<'_>) -> Option<BackgroundAsset>;

/// Tried in order against each background-bearing element.
const BACKGROUND_MATCHERS: [BackgroundMatcher; 2] = [inline_style_image, animated_video_source];

/// Matches a static image set through the element's inline style.
fn inline_style_image(element: ElementRef<'_>) -> Option<BackgroundAsset> {
    element
        .value()
        .attr("style")
        .and_then(patterns::extract_style_background)
        .map(BackgroundAsset::Image)
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Matches the MP4 source of an animated background video. The wrapper, the
/// video and the source must each be a direct child of the previous one.
fn animated_video_source(element: ElementRef<'_>) -> Option<BackgroundAsset> {
    child_elements(element)
        .filter(|child| ANIMATED_WRAPPER_SELECTOR.matches(child))
        .flat_map(child_elements)
        .filter(|child| child.value().name() == "video")
        .flat_map(child_elements)
        .filter(|child| MP4_SOURCE_SELECTOR.matches(child))
        .find_map(|source| source.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| BackgroundAsset::Video(src.to_string()))
}

/// Finds the profile background in a community profile page.
///
/// The first background-bearing element in document order that yields an
/// asset wins.
#[must_use]
pub fn find_background(html: &str) -> BackgroundAsset {
    let document = Html::parse_document(html);

    document
        .select(&PROFILE_BACKGROUND_SELECTOR)
        .find_map(|element| {
            let found = BACKGROUND_MATCHERS
                .iter()
                .find_map(|matcher| matcher(element));
            trace!(matched = found.is_some(), "Checked background element");
            found
        })
        .unwrap_or(BackgroundAsset::None)
}

/// Returns the value of the first input holding a `STEAM_...` legacy ID.
#[must_use]
pub fn find_legacy_id_value(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&LEGACY_ID_INPUT_SELECTOR)
        .find_map(|input| input.value().attr("value"))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>Profile</title></head><body>{body}</body></html>")
    }

    const VIDEO_BLOCK: &str = r#"
        <div class="profile_animated_background">
            <video playsinline autoplay muted loop poster="https://x/poster.jpg">
                <source src="https://x/bg.webm" type="video/webm">
                <source src="https://x/bg.mp4" type="video/mp4">
            </video>
        </div>"#;

    #[test]
    fn test_inline_style_image() {
        let html = page(
            r#"<div class="responsive_page_template_content">
                <div class="no_header profile_page has_profile_background" style="background-image: url('https://x/y.jpg');"></div>
            </div>"#,
        );

        assert_eq!(
            find_background(&html),
            BackgroundAsset::Image("https://x/y.jpg".to_string())
        );
    }

    #[test]
    fn test_animated_video() {
        let html = page(&format!(
            r#"<div class="profile_page has_profile_background">{VIDEO_BLOCK}</div>"#
        ));

        assert_eq!(
            find_background(&html),
            BackgroundAsset::Video("https://x/bg.mp4".to_string())
        );
    }

    #[test]
    fn test_style_takes_precedence_over_video() {
        let html = page(&format!(
            r#"<div class="profile_page has_profile_background" style="background-image: url( 'https://x/still.jpg' );">{VIDEO_BLOCK}</div>"#
        ));

        assert_eq!(
            find_background(&html),
            BackgroundAsset::Image("https://x/still.jpg".to_string())
        );
    }

    #[test]
    fn test_outer_wrapper_does_not_match_stray_video() {
        let html = page(
            r#"<div class="profile_animated_background">
                <div class="profile_page has_profile_background">
                    <video><source src="https://x/stray.mp4" type="video/mp4"></video>
                </div>
            </div>"#,
        );

        assert_eq!(find_background(&html), BackgroundAsset::None);
    }

    #[test]
    fn test_video_nested_below_wrapper_children_is_ignored() {
        let html = page(
            r#"<div class="profile_page has_profile_background">
                <div class="profile_content">
                    <div class="profile_animated_background">
                        <video><source src="https://x/deep.mp4" type="video/mp4"></video>
                    </div>
                </div>
            </div>"#,
        );

        assert_eq!(find_background(&html), BackgroundAsset::None);
    }

    #[test]
    fn test_no_background() {
        let html = page(r#"<div class="profile_page"><div class="profile_header"></div></div>"#);
        assert_eq!(find_background(&html), BackgroundAsset::None);
    }

    #[test]
    fn test_marker_without_asset() {
        let html = page(r#"<div class="profile_page has_profile_background" style="color: red"></div>"#);
        assert_eq!(find_background(&html), BackgroundAsset::None);
    }

    #[test]
    fn test_requires_both_class_markers() {
        let html = page(r#"<div class="has_profile_background" style="background-image: url('https://x/y.jpg');"></div>"#);
        assert_eq!(find_background(&html), BackgroundAsset::None);
    }

    #[test]
    fn test_first_background_element_wins() {
        let html = page(&format!(
            r#"<div class="profile_page has_profile_background"></div>
               <div class="profile_page has_profile_background">{VIDEO_BLOCK}</div>
               <div class="profile_page has_profile_background" style="background-image: url('https://x/late.jpg');"></div>"#
        ));

        assert_eq!(
            find_background(&html),
            BackgroundAsset::Video("https://x/bg.mp4".to_string())
        );
    }

    #[test]
    fn test_find_legacy_id_value() {
        let html = page(
            r#"<form>
                <input type="text" value="76561197960290419" readonly>
                <input type="text" value="STEAM_0:1:12345" readonly>
                <input type="text" value="STEAM_0:0:1" readonly>
            </form>"#,
        );

        assert_eq!(find_legacy_id_value(&html).as_deref(), Some("STEAM_0:1:12345"));
        assert_eq!(find_legacy_id_value(&page("<p>nothing</p>")), None);
    }
}
