//! ERP tables and the field aliases the query layer returns for them.
//!
//! Table names and raw column names are used in conditions, joins and
//! orderings. Result rows are keyed by the aliases below, which the query
//! layer assigns per table.
//!
//! # Important
//!
//! The aliases MUST match the query layer's field mapping. Joined queries
//! return the union of the joined tables' aliases; where two tables share an
//! alias the query layer prefixes it with the table (`ALK_erfassung`).

/// `ALK00`: delivery/picking document headers (one row per shipment or picking run).
///
/// Both picking documents and delivery notes live here; picking documents
/// carry `0` as delivery note number.
pub mod delivery_header {
    pub const TABLE: &str = "ALK00";

    /// Record number of the header (position key).
    pub const RECORD_NO: &str = "satznr";
    /// Record number of the header this one follows up on, if any.
    pub const RELATED_HEADER: &str = "bezogener_kopf";
    pub const ORDER_NO: &str = "auftragsnr";
    pub const CUSTOMER_ORDER_NO: &str = "auftragsnr_kunde";
    pub const CAPTURED: &str = "ALK_erfassung";
    pub const CHANGED: &str = "ALK_aenderung";
    /// Date the delivery note was printed.
    pub const DELIVERY_NOTE_DATE: &str = "ALK_lieferschein";
    pub const ARRIVAL_DATE: &str = "anliefer_date";
    pub const INVOICE_RECIPIENT: &str = "rechnungsempfaenger";
    pub const GOODS_RECIPIENT: &str = "warenempfaenger";
    pub const WAREHOUSE: &str = "lager";
    pub const PICKING_NO: &str = "kommibelegnr";
    pub const PICKING_DATE: &str = "kommibeleg_date";
    pub const DELIVERY_NOTE_NO: &str = "lieferscheinnr";
    pub const ORDER_KIND: &str = "art";
    /// File maintenance key ("Dateiführungsschlüssel"); set while a record is being rewritten.
    pub const MAINTENANCE_FLAG: &str = "ALK00_dfsl";

    pub const COL_RECORD_NO: &str = "LKSANK";
    pub const COL_DELIVERY_NOTE_NO: &str = "LKLFSN";
    pub const COL_STATUS: &str = "LKSTAT";
    pub const COL_PICKING_NO: &str = "LKKBNR";
    pub const COL_ORDER_NO: &str = "LKAUFS";
    pub const COL_CUSTOMER_NO: &str = "LKKDNR";
    pub const COL_CAPTURED: &str = "LKDTER";
    pub const COL_CHANGED: &str = "LKDTAE";
    /// Customer-specific "processed" marker, `0` until a consumer took the note over.
    pub const COL_PROCESSED: &str = "LKKZ02";
}

/// `ALN00`: delivery/picking document positions.
pub mod delivery_position {
    pub const TABLE: &str = "ALN00";

    pub const HEADER_RECORD_NO: &str = "satznr_kopf";
    pub const ORDER_NO: &str = "auftragsnr";
    pub const ORDER_POSITION: &str = "auftrags_position";
    pub const PICKING_NO: &str = "kommibelegnr";
    pub const PICKING_POSITION: &str = "kommibeleg_position";
    pub const ARTICLE_NO: &str = "artnr";
    /// Shipped quantity (delivery note).
    pub const SHIPPED_QUANTITY: &str = "menge";
    /// Quantity to pick (picking document).
    pub const PICKING_QUANTITY: &str = "menge_komissionierbeleg";
    /// Staff code of the last writer.
    pub const LAST_HANDLER: &str = "sachbearbeiter_bearbeitung";
    pub const MAINTENANCE_FLAG: &str = "ALN00_dfsl";

    pub const COL_STATUS: &str = "LNSTAT";
    pub const COL_HEADER_RECORD_NO: &str = "LNSANK";
    pub const COL_ORDER_NO: &str = "LNAUFN";
    pub const COL_DELIVERY_NOTE_NO: &str = "LNLFSN";
    pub const COL_SHIP_DATE: &str = "LNDTLF";
}

/// `AAK00`: order headers.
pub mod order_header {
    pub const TABLE: &str = "AAK00";

    pub const COL_ORDER_NO: &str = "AKAUFN";
    pub const COL_STOCK_MODE: &str = "AKLGN2";
}

/// `XAD00`: order-specific address overrides (`ADAART=1`: delivery address).
pub mod order_address {
    pub const TABLE: &str = "XAD00";

    pub const ORDER_NO: &str = "nr";
    pub const SHIP_TO_NO: &str = "versandadressnr";

    pub const COL_KIND: &str = "ADAART";
    pub const COL_ORDER_NO: &str = "ADRGNR";
}

/// Address columns shared by customer, address and header rows.
pub mod address {
    pub const NAME1: &str = "name1";
    pub const NAME2: &str = "name2";
    pub const NAME3: &str = "name3";
    pub const STREET: &str = "strasse";
    pub const COUNTRY_CODE: &str = "laenderkennzeichen";
    pub const POSTCODE: &str = "plz";
    pub const CITY: &str = "ort";
    pub const PHONE: &str = "tel";
    pub const FAX: &str = "fax";
}

/// `XKD00`: customer master.
pub mod customer {
    pub const TABLE: &str = "XKD00";

    pub const CUSTOMER_NO: &str = "kundennr";
    pub const MOBILE: &str = "mobil";
    pub const MAIL: &str = "mail";
    pub const VAT_ID: &str = "ustid";
    pub const ADDRESS_FILE_ID: &str = "adressdatei_id";
    pub const COMPANY: &str = "company";
    pub const ACCOUNT_MANAGER: &str = "betreuer";
    pub const INTERNAL_COMPANY_NO: &str = "interne_firmennr";
    pub const OUR_SUPPLIER_NO: &str = "unsere_lieferantennr";
    pub const ASSOCIATION_NO: &str = "verbandsnr";
    pub const MEMBER_NO: &str = "mitgliedsnr";
    pub const GLN: &str = "iln";
    pub const CREATED: &str = "erfassung_date";
    pub const CHANGED: &str = "aenderung_date";

    pub const COL_CUSTOMER_NO: &str = "KDKDNR";
    pub const COL_STATUS: &str = "KDSTAT";
    pub const COL_CREATED: &str = "KDDTER";
    pub const COL_CHANGED: &str = "KDDTAE";
}

/// `XKS00`: customer supplementary data (GLN).
pub mod customer_extra {
    pub const TABLE: &str = "XKS00";

    pub const CUSTOMER_NO: &str = "kundennr";

    pub const COL_CUSTOMER_NO: &str = "KSKDNR";
    pub const COL_GLN: &str = "KCE2IL";
}

/// `AKZ00`: customer sales terms.
pub mod customer_terms {
    pub const TABLE: &str = "AKZ00";

    pub const COL_CUSTOMER_NO: &str = "KZKDNR";
    pub const COL_CHANGED: &str = "KZDTAE";
}

/// `AVA00`: alternate ship-to addresses of a customer.
pub mod ship_to {
    pub const TABLE: &str = "AVA00";

    /// Record number in the generic address file `XXA00`.
    pub const ADDRESS_RECORD_NO: &str = "satznr";
    pub const SHIP_TO_NO: &str = "versandadresssnr";

    pub const COL_CUSTOMER_NO: &str = "VAKDNR";
    pub const COL_SHIP_TO_NO: &str = "VAVANR";
    pub const COL_STATUS: &str = "VASTAT";
    pub const COL_GLN: &str = "VAILN";
    pub const COL_ADDRESS_RECORD_NO: &str = "VASANR";
}

/// `XXA00`: generic address file.
pub mod generic_address {
    pub const TABLE: &str = "XXA00";

    pub const COL_RECORD_NO: &str = "XASANR";
}

/// Additional aliases of the warehouse outflow extract (`ALN00` ⨝ `ALK00` ⨝ `AAK00`).
pub mod outflow {
    pub const ORDER_NO: &str = "auftragsnr";
    pub const DELIVERY_NOTE_NO: &str = "lieferscheinnr";
    pub const POSITION_DELIVERY_NOTE_NO: &str = "ALN_lieferscheinnr";
    pub const BILLED_QUANTITY: &str = "menge_fakturierung";
    pub const ORDER_KIND: &str = "art";
    pub const ARTICLE_NO: &str = "artnr";
    pub const GOODS_RECIPIENT: &str = "warenempfaenger";
    pub const INVOICE_RECIPIENT: &str = "rechnungsempfaenger";
    pub const SET_ARTICLE: &str = "setartikel";
    pub const VALUE: &str = "wert";
    pub const ORDER_POSITION: &str = "auftrags_position";
    pub const PICKING_POSITION: &str = "kommibeleg_position";
    pub const DELIVERY_NOTE_DATE: &str = "ALK_lieferschein_date";
    pub const POSITION_ARRIVAL_DATE: &str = "ALN_anliefer_date";
    pub const ARRIVAL_DATE: &str = "anliefer_date";
    pub const SHIP_DATE: &str = "versand_date";
    pub const HEADER_SHIP_DATE: &str = "lieferschein_date";
    pub const ORDER_CAPTURED: &str = "AAK_erfassung_date";

    /// Columns requested for the extract.
    pub const FIELDS: &[&str] = &[
        "LNAUFN", "LNAUPO", "LNARTN", "LNKZKO", "LNKDRG", "LNKDNR", "LNLFSN", "LNMNGL", "LNDTLF",
        "LNDTVS", "LNMNGF", "LNDTER", "LNLWA2", "LKKDRG", "LKKDNR", "LKLFSN", "LKDTLF", "LKDTKB",
        "LKAUFS", "LKDTLT", "AKAUFN", "AKAUFA", "AKDTLT", "AKDTER", "LNBELP", "LNDTLT",
    ];
}
