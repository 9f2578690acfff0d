//! 欄位名稱與別名

/// 標準欄位及其在來源檔案中可能的名稱
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// 標準名稱（用於錯誤訊息）
    pub name: &'static str,

    /// 來源欄位名稱，依優先順序
    pub aliases: &'static [&'static str],
}

pub const MATERIAL: Column = Column {
    name: "material",
    aliases: &["Materialnummer", "numer indeksu", "Material"],
};

pub const DOCUMENT: Column = Column {
    name: "document",
    aliases: &["DocNum", "Dokument"],
};

pub const DELIVERY_DATE: Column = Column {
    name: "delivery_date",
    aliases: &["Data dostawy", "Liefertermin"],
};

pub const ORDERED: Column = Column {
    name: "ordered",
    aliases: &["Zamówione", "Bestellt"],
};

pub const CONFIRMED: Column = Column {
    name: "confirmed",
    aliases: &["Potwierdzone", "Bestätigt"],
};

pub const ON_HAND: Column = Column {
    name: "on_hand",
    aliases: &["w magazynie", "Dostępne"],
};
