//! Action dispatch by title.
//!
//! Titles are looked up in the descriptor's per-locale command map; a locale
//! unknown at registration time falls back to translating every declared
//! title. Arguments are adapted to the action's arity before invocation.

use crate::browser::Browser;
use crate::i18n::Locale;
use crate::page::{ActionArg, ActionArgs, AnyPage};
use crate::registry::{ActionDescriptor, PageDescriptor};
use crate::result::{RotuloError, RotuloResult};
use serde_json::Value;
use tracing::debug;

/// Find the action answering to `title` in `locale`
#[must_use]
pub fn find_action<'a>(
    descriptor: &'a PageDescriptor,
    locale: &Locale,
    title: &str,
) -> Option<&'a ActionDescriptor> {
    match descriptor.command(locale, title) {
        Some(index) => index.and_then(|i| descriptor.actions().get(i)),
        None => descriptor
            .actions()
            .iter()
            .find(|a| a.answers_to(descriptor.translator(), locale, title)),
    }
}

/// Fit `args` to an action taking `arity` parameters
///
/// Exact counts pass through, a single list spreads into text arguments, and
/// several texts collapse into one list for a single-parameter action.
#[must_use]
pub fn adapt_arguments(arity: usize, args: &ActionArgs) -> Option<ActionArgs> {
    if args.len() == arity {
        return Some(args.clone());
    }
    match args.as_slice() {
        [ActionArg::List(items)] if items.len() == arity => Some(ActionArgs::texts(items.iter().cloned())),
        texts if arity == 1 && texts.len() > 1 && texts.iter().all(|a| matches!(a, ActionArg::Text(_))) => {
            let items = texts
                .iter()
                .filter_map(|a| match a {
                    ActionArg::Text(s) => Some(s.clone()),
                    _ => None,
                })
                .collect();
            Some(ActionArgs::new(vec![ActionArg::List(items)]))
        }
        _ => None,
    }
}

/// Invoke the action titled `title` on the current page
pub fn dispatch(
    descriptor: &PageDescriptor,
    page: &mut AnyPage,
    browser: &Browser,
    locale: &Locale,
    title: &str,
    args: &ActionArgs,
) -> RotuloResult<Value> {
    let action = find_action(descriptor, locale, title)
        .ok_or_else(|| RotuloError::not_found("action", title, descriptor.title()))?;
    let failed = |source: RotuloError| RotuloError::ActionFailed {
        title: title.to_string(),
        page: descriptor.title().to_string(),
        source: Box::new(source),
    };
    let adapted = adapt_arguments(action.arity(), args).ok_or_else(|| {
        failed(RotuloError::assertion(format!(
            "wrong arity: expected {}, got {}",
            action.arity(),
            args.len()
        )))
    })?;
    debug!(page = descriptor.title(), title, %locale, arity = action.arity(), "dispatching action");
    action
        .invoke(page, browser, &adapted)
        .map_err(|e| failed(e.on_page(descriptor.title())))
}
