use clap::{Args, Subcommand};
use tam::{ApiResponse, Client, Locale, Page, PagingContext};

use crate::{
    commands::error::ListError,
    console::{display_text, print_table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Articles,
    Players,
    Teams,
    Users,
}

#[derive(Subcommand)]
pub enum ResourceCommand {
    /// List one page of records
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// 1-based page number
    #[clap(long, default_value_t = 1)]
    pub page: u32,

    #[clap(long, default_value_t = 8)]
    pub page_size: u32,

    /// optional - Free text search
    #[clap(long)]
    pub search: Option<String>,

    /// optional - Language the search text is matched in (fa or en)
    #[clap(long)]
    pub search_language: Option<Locale>,

    /// optional - Extra filters as key=value, e.g. position=GK or type=admin
    #[clap(long)]
    pub filter: Vec<String>,
}

impl ListArgs {
    pub fn paging_context(&self) -> Result<PagingContext, ListError> {
        let mut paging = PagingContext::new(self.page, self.page_size);
        if let Some(search) = &self.search {
            paging = paging.with_search(search.clone(), self.search_language);
        }

        for filter in &self.filter {
            let Some((key, value)) = filter.split_once('=') else {
                return Err(ListError::InvalidFilter(filter.clone()));
            };
            paging = paging.with_filter(key.trim(), value.trim());
        }

        Ok(paging)
    }
}

fn page_footer<T>(page: &Page<T>, paging: &PagingContext) -> String {
    let pages = page.count.div_ceil(u64::from(paging.page_size.max(1))).max(1);
    let mut footer = format!("Page {} of {} ({} total)", paging.page, pages, page.count);
    if let Some(next) = paging.next(page) {
        footer.push_str(&format!(", next: --page {}", next.page));
    }
    footer
}

fn unwrap_page<T>(response: ApiResponse<Page<T>>) -> Result<Page<T>, ListError> {
    response.into_result().map_err(|content| ListError::Failed(content.summary()))
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub async fn handle_list(
    resource: Resource,
    command: &ResourceCommand,
    client: &Client,
    locale: Locale,
) -> Result<(), ListError> {
    let ResourceCommand::List(args) = command;
    let paging = args.paging_context()?;
    let admin = client.admin();

    let (title, headers, rows, footer) = match resource {
        Resource::Articles => {
            let page = unwrap_page(admin.articles.list(&paging).await?)?;
            let rows: Vec<Vec<String>> = page
                .results
                .iter()
                .map(|article| {
                    vec![
                        article.id.to_string(),
                        display_text(&article.title, locale),
                        article.status.clone(),
                        or_dash(article.kind.as_ref()),
                        article.hits_count.to_string(),
                        article.likes_count.to_string(),
                        or_dash(article.updated_date.as_ref()),
                    ]
                })
                .collect();
            let headers = vec!["Id", "Title", "Status", "Type", "Hits", "Likes", "Updated"];
            ("Articles", headers, rows, page_footer(&page, &paging))
        }
        Resource::Players => {
            let page = unwrap_page(admin.players.list(&paging).await?)?;
            let rows: Vec<Vec<String>> = page
                .results
                .iter()
                .map(|player| {
                    vec![
                        player.id.to_string(),
                        display_text(&player.name, locale),
                        or_dash(player.number),
                        or_dash(player.position.as_ref()),
                        or_dash(player.goals),
                        or_dash(player.games),
                    ]
                })
                .collect();
            let headers = vec!["Id", "Name", "Number", "Position", "Goals", "Games"];
            ("Players", headers, rows, page_footer(&page, &paging))
        }
        Resource::Teams => {
            let page = unwrap_page(admin.teams.list(&paging).await?)?;
            let rows: Vec<Vec<String>> = page
                .results
                .iter()
                .map(|team| {
                    vec![
                        team.id.to_string(),
                        display_text(&team.name, locale),
                        or_dash(team.slug.as_ref()),
                    ]
                })
                .collect();
            ("Teams", vec!["Id", "Name", "Slug"], rows, page_footer(&page, &paging))
        }
        Resource::Users => {
            let page = unwrap_page(admin.users.list(&paging).await?)?;
            let rows: Vec<Vec<String>> = page
                .results
                .iter()
                .map(|user| {
                    let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" ");
                    vec![
                        user.id.to_string(),
                        user.phone_number.clone(),
                        if name.is_empty() { "-".to_string() } else { name },
                        if user.is_active { "Active" } else { "Inactive" }.to_string(),
                    ]
                })
                .collect();
            ("Users", vec!["Id", "Phone", "Name", "Status"], rows, page_footer(&page, &paging))
        }
    };

    if rows.is_empty() {
        println!("No {} found.", title.to_lowercase());
        return Ok(());
    }

    print_table(headers, rows, Some(&format!("{}:", title)), Some(&footer));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(filter: Vec<&str>) -> ListArgs {
        ListArgs {
            page: 0,
            page_size: 8,
            search: Some("علی".to_string()),
            search_language: Some(Locale::Fa),
            filter: filter.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_paging_context_from_args() {
        let paging = args(vec!["position=GK"]).paging_context().unwrap();

        assert_eq!(paging.page, 1);
        assert_eq!(paging.filters, vec![("position".to_string(), "GK".to_string())]);
        assert_eq!(paging.search.as_deref(), Some("علی"));
    }

    #[test]
    fn test_filter_without_value_is_rejected() {
        assert!(matches!(
            args(vec!["position"]).paging_context(),
            Err(ListError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_page_footer() {
        let paging = PagingContext::new(1, 8);
        let page: Page<u8> = Page {
            count: 17,
            next: Some("http://localhost:8000/api/admin/players/?page=2".to_string()),
            previous: None,
            results: vec![],
        };

        assert_eq!(page_footer(&page, &paging), "Page 1 of 3 (17 total), next: --page 2");
    }
}
