//! Static currency metadata used for display and lookup

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub flag: &'static str,
}

const fn info(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    flag: &'static str,
) -> CurrencyInfo {
    CurrencyInfo {
        code,
        name,
        symbol,
        flag,
    }
}

/// Number of leading entries in [`CURRENCIES`] shown when no search query is given.
const POPULAR_COUNT: usize = 12;

pub static CURRENCIES: &[CurrencyInfo] = &[
    info("USD", "US Dollar", "$", "🇺🇸"),
    info("EUR", "Euro", "€", "🇪🇺"),
    info("GBP", "British Pound", "£", "🇬🇧"),
    info("JPY", "Japanese Yen", "¥", "🇯🇵"),
    info("AUD", "Australian Dollar", "A$", "🇦🇺"),
    info("CAD", "Canadian Dollar", "C$", "🇨🇦"),
    info("CHF", "Swiss Franc", "CHF", "🇨🇭"),
    info("CNY", "Chinese Yuan", "¥", "🇨🇳"),
    info("INR", "Indian Rupee", "₹", "🇮🇳"),
    info("SGD", "Singapore Dollar", "S$", "🇸🇬"),
    info("HKD", "Hong Kong Dollar", "HK$", "🇭🇰"),
    info("NZD", "New Zealand Dollar", "NZ$", "🇳🇿"),
    info("SEK", "Swedish Krona", "kr", "🇸🇪"),
    info("NOK", "Norwegian Krone", "kr", "🇳🇴"),
    info("DKK", "Danish Krone", "kr", "🇩🇰"),
    info("PLN", "Polish Zloty", "zł", "🇵🇱"),
    info("CZK", "Czech Koruna", "Kč", "🇨🇿"),
    info("HUF", "Hungarian Forint", "Ft", "🇭🇺"),
    info("RUB", "Russian Ruble", "₽", "🇷🇺"),
    info("TRY", "Turkish Lira", "₺", "🇹🇷"),
    info("ZAR", "South African Rand", "R", "🇿🇦"),
    info("BRL", "Brazilian Real", "R$", "🇧🇷"),
    info("MXN", "Mexican Peso", "$", "🇲🇽"),
    info("ARS", "Argentine Peso", "$", "🇦🇷"),
    info("CLP", "Chilean Peso", "$", "🇨🇱"),
    info("KRW", "South Korean Won", "₩", "🇰🇷"),
    info("THB", "Thai Baht", "฿", "🇹🇭"),
    info("IDR", "Indonesian Rupiah", "Rp", "🇮🇩"),
    info("MYR", "Malaysian Ringgit", "RM", "🇲🇾"),
    info("PHP", "Philippine Peso", "₱", "🇵🇭"),
    info("VND", "Vietnamese Dong", "₫", "🇻🇳"),
    info("AED", "UAE Dirham", "د.إ", "🇦🇪"),
    info("SAR", "Saudi Riyal", "﷼", "🇸🇦"),
    info("ILS", "Israeli New Shekel", "₪", "🇮🇱"),
    info("EGP", "Egyptian Pound", "E£", "🇪🇬"),
    info("NGN", "Nigerian Naira", "₦", "🇳🇬"),
    info("KES", "Kenyan Shilling", "KSh", "🇰🇪"),
    info("PKR", "Pakistani Rupee", "₨", "🇵🇰"),
];

pub fn popular() -> &'static [CurrencyInfo] {
    &CURRENCIES[..POPULAR_COUNT]
}

pub fn find(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Case-insensitive substring match against code or name. An empty query yields [`popular`].
pub fn search(query: &str) -> Vec<&'static CurrencyInfo> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return popular().iter().collect();
    }

    CURRENCIES
        .iter()
        .filter(|c| {
            c.code.to_lowercase().contains(&query) || c.name.to_lowercase().contains(&query)
        })
        .collect()
}

/// Display symbol for a code, falling back to the code itself.
pub fn symbol(code: &str) -> &str {
    find(code).map_or(code, |c| c.symbol)
}
