use futures::future::try_join_all;
use shared::{domain::FestivalDate, protocol::LineupInfo};

use crate::{ClientResult, LineupApi};

/// All three festival days, fetched concurrently and concatenated in day
/// order. Unlike ticket lookups, one failed day fails the whole lineup.
pub async fn full_lineup<A>(api: &A) -> ClientResult<Vec<LineupInfo>>
where
    A: LineupApi + ?Sized,
{
    let days = try_join_all(FestivalDate::ALL.map(|date| api.lineup(date))).await?;
    Ok(days.into_iter().flatten().collect())
}
