use crate::domain::{
    BookingId, ItemId, UserId,
    booking::{Booking, BookingQuery, BookingStatus, NewBooking},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約ライフサイクルのポート
///
/// 読み取り系はアイテムと予約者を結合した `Booking` を返す。
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: NewBooking) -> Result<BookingId>;

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// ステータスを書き換える
    ///
    /// 現在値が `status` と異なる場合だけ更新し、更新した場合にtrueを返す。
    async fn update_status(&self, booking_id: BookingId, status: BookingStatus) -> Result<bool>;

    /// 視点・フィルタ・並び順・ページを指定して一覧を取得する
    async fn find(&self, query: &BookingQuery) -> Result<Vec<Booking>>;

    /// 開始が now 以前で最も遅い予約
    async fn find_last_for_item(&self, item_id: ItemId, now: DateTime<Utc>)
    -> Result<Option<Booking>>;

    /// 開始が now より後で最も早い予約
    async fn find_next_for_item(&self, item_id: ItemId, now: DateTime<Utc>)
    -> Result<Option<Booking>>;

    /// コメント可否の判定用：予約者のそのアイテムの予約で、終了が now より前のもの
    async fn find_finished_for_comment(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>>;
}
