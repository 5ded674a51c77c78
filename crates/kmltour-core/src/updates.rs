//! Ready-made animated updates for balloons and overlays
//!
//! Each helper builds an [`AnimatedUpdate`] holding a single `<Change>` that
//! targets an existing entity by id. Append the result to a tour playlist.

use crate::error::{KmlError, Result};
use crate::feature::Feature;
use crate::render::fmt_bool;
use crate::style::Color;
use crate::tour::{AnimatedUpdate, AnimatedUpdateOptions, Tour, Wait};
use crate::xml::Element;

/// `<Change><{kind} targetId="{id}"><{field}>{value}</{field}></{kind}></Change>`
fn change(kind: &str, target_id: &str, field: &str, value: impl Into<String>) -> Element {
    let mut target = Element::new(kind).attr("targetId", target_id);
    target.push(Element::with_text(field, value));
    let mut change = Element::new("Change");
    change.push(target);
    change
}

fn single_change(change: Element, options: AnimatedUpdateOptions) -> AnimatedUpdate {
    let mut update = AnimatedUpdate::new(options);
    update.push_element(change);
    update
}

/// Show or hide the popup balloon of a placemark or screen overlay
///
/// # Errors
///
/// Returns [`KmlError::InvalidCapability`] for any other feature kind.
pub fn toggle_balloon_for(
    feature: &Feature,
    visible: bool,
    options: AnimatedUpdateOptions,
) -> Result<AnimatedUpdate> {
    let kind = match feature {
        Feature::Placemark(_) | Feature::ScreenOverlay(_) => feature.kind(),
        other => {
            return Err(KmlError::InvalidCapability(format!(
                "balloons can only be toggled on a Placemark or ScreenOverlay, not a {}",
                other.kind()
            )))
        }
    };
    let element = change(kind, feature.data().id(), "gx:balloonVisibility", fmt_bool(visible));
    Ok(single_change(element, options))
}

/// Shorthand for [`toggle_balloon_for`] with `visible = true`
///
/// # Errors
///
/// See [`toggle_balloon_for`].
pub fn show_balloon_for(feature: &Feature, options: AnimatedUpdateOptions) -> Result<AnimatedUpdate> {
    toggle_balloon_for(feature, true, options)
}

/// Shorthand for [`toggle_balloon_for`] with `visible = false`
///
/// # Errors
///
/// See [`toggle_balloon_for`].
pub fn hide_balloon_for(feature: &Feature, options: AnimatedUpdateOptions) -> Result<AnimatedUpdate> {
    toggle_balloon_for(feature, false, options)
}

/// Show a balloon, wait `wait` seconds, then hide it again
///
/// # Errors
///
/// See [`toggle_balloon_for`]. Nothing is appended to `tour` on error.
pub fn show_hide_balloon(
    tour: &mut Tour,
    feature: &Feature,
    wait: f64,
    options: &AnimatedUpdateOptions,
) -> Result<()> {
    let show = show_balloon_for(feature, options.clone())?;
    let hide = hide_balloon_for(feature, options.clone())?;
    tour.push(show);
    tour.push(Wait::new(wait));
    tour.push(hide);
    Ok(())
}

/// Change a placemark's color, fading its balloon over `options.duration`
///
/// # Errors
///
/// Returns [`KmlError::InvalidCapability`] unless `feature` is a placemark.
pub fn fade_balloon_for(
    feature: &Feature,
    color: Color,
    options: AnimatedUpdateOptions,
) -> Result<AnimatedUpdate> {
    let Feature::Placemark(placemark) = feature else {
        return Err(KmlError::InvalidCapability(format!(
            "balloons can only be faded on a Placemark, not a {}",
            feature.kind()
        )));
    };
    let element = change("Placemark", placemark.feature.id(), "color", color.to_string());
    Ok(single_change(element, options))
}

/// Fade a placemark's balloon to opaque white
///
/// # Errors
///
/// See [`fade_balloon_for`].
pub fn fade_in_balloon_for(feature: &Feature, options: AnimatedUpdateOptions) -> Result<AnimatedUpdate> {
    fade_balloon_for(feature, Color::WHITE, options)
}

/// Fade a placemark's balloon to transparent
///
/// # Errors
///
/// See [`fade_balloon_for`].
pub fn fade_out_balloon_for(feature: &Feature, options: AnimatedUpdateOptions) -> Result<AnimatedUpdate> {
    fade_balloon_for(feature, Color::TRANSPARENT, options)
}

/// Fade the screen overlay with id `target_id` in or out
#[must_use]
pub fn fade_overlay(target_id: &str, show: bool, options: AnimatedUpdateOptions) -> AnimatedUpdate {
    let color = if show { Color::WHITE } else { Color::TRANSPARENT };
    single_change(
        change("ScreenOverlay", target_id, "color", color.to_string()),
        options,
    )
}
