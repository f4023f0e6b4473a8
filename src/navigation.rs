//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{endpoints, report::Period};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link {
    url: String,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

/// The links along the top of the dashboard: one per reporting period.
pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Get the navigation bar with the link for `active_period` marked as active.
    pub fn new(active_period: Period) -> NavBar {
        let links = Period::ALL
            .into_iter()
            .map(|period| Link {
                url: format!(
                    "{}?period={}",
                    endpoints::DASHBOARD_VIEW,
                    period.as_query_value()
                ),
                title: period.label(),
                is_current: period == active_period,
            })
            .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold
                                whitespace-nowrap dark:text-white"
                        {
                            "Paydesk"
                        }
                    }

                    ul
                        class="font-medium flex flex-row p-0 space-x-8
                            rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::report::Period;

    use super::NavBar;

    #[test]
    fn marks_active_period() {
        let html = Html::parse_fragment(&NavBar::new(Period::Weekly).into_html().into_string());
        let selector = Selector::parse("a[aria-current='page']").unwrap();

        let active: Vec<_> = html.select(&selector).collect();

        assert_eq!(active.len(), 1);
        assert_eq!(
            active[0].value().attr("href"),
            Some("/dashboard?period=weekly")
        );
        assert_eq!(active[0].text().collect::<String>(), "This week");
    }

    #[test]
    fn links_every_period() {
        let html = Html::parse_fragment(&NavBar::new(Period::Monthly).into_html().into_string());
        let selector = Selector::parse("ul a").unwrap();

        assert_eq!(html.select(&selector).count(), Period::ALL.len());
    }
}
