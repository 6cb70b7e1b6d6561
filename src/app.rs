use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::config::StatsConfig;
use crate::pages::prices::PricesPage;

#[component]
pub fn App() -> impl IntoView {
    provide_context(StatsConfig::default());

    // `/selection` is the shareable address; both routes show the same page.
    view! {
        <Router>
            <div class="app-layout">
                <header class="app-header">
                    <h1 class="app-title">"Boligpris"</h1>
                    <p class="app-subtitle">"Average square metre prices from Statistics Norway"</p>
                </header>
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=PricesPage />
                        <Route path=path!("/selection") view=PricesPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
