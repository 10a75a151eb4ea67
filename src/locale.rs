use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

struct Labels {
    months: [&'static str; 12],
    days: [&'static str; 7],
}

static BUILTIN: phf::Map<&'static str, Labels> = phf_map! {
    "ar" => Labels {
        months: ["يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر"],
        days: ["أحد", "أثنين", "ثلاثاء", "اربعاء", "خميس", "جمعه", "سبت"],
    },
    "az" => Labels {
        months: ["Yanvar", "Fevral", "Mart", "Aprel", "May", "İyun", "İyul", "Avqust", "Sentyabr", "Oktyabr", "Noyabr", "Dekabr"],
        days: ["Baz", "B.e", "Ç.A", "Çərş", "C.A", "Cümə", "Şən"],
    },
    "ca" => Labels {
        months: ["Gener", "Febrer", "Març", "Abril", "Maig", "Juny", "Juliol", "Agost", "Setembre", "Octubre", "Novembre", "Desembre"],
        days: ["Dg", "Dl", "Dt", "Dc", "Dj", "Dv", "Ds"],
    },
    "cn" => Labels {
        months: ["一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月", "十二月"],
        days: ["星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六"],
    },
    "cs" => Labels {
        months: ["Leden", "Únor", "Březen", "Duben", "Květen", "Červen", "Červenec", "Srpen", "Září", "Říjen", "Listopad", "Prosinec"],
        days: ["Ne", "Po", "Út", "St", "Čt", "Pá", "So"],
    },
    "de" => Labels {
        months: ["Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober", "November", "Dezember"],
        days: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
    },
    "en" => Labels {
        months: ["January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November", "December"],
        days: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    },
    "es" => Labels {
        months: ["Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre"],
        days: ["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sá"],
    },
    "fi" => Labels {
        months: ["Tammikuu", "Helmikuu", "Maaliskuu", "Huhtikuu", "Toukokuu", "Kesäkuu", "Heinäkuu", "Elokuu", "Syyskuu", "Lokakuu", "Marraskuu", "Joulukuu"],
        days: ["Su", "Ma", "Ti", "Ke", "To", "Pe", "La"],
    },
    "fr" => Labels {
        months: ["Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre"],
        days: ["Dim", "Lun", "Mar", "Mer", "Jeu", "Ven", "Sam"],
    },
    "he" => Labels {
        months: ["ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני", "יולי", "אוגוסט", "ספטמבר", "אוקטובר", "נובמבר", "דצמבר"],
        days: ["א", "ב", "ג", "ד", "ה", "ו", "ש"],
    },
    "hu" => Labels {
        months: ["Január", "Február", "Március", "Április", "Május", "Június", "Július", "Augusztus", "Szeptember", "Október", "November", "December"],
        days: ["Va", "Hé", "Ke", "Sze", "Cs", "Pé", "Szo"],
    },
    "id" => Labels {
        months: ["Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September", "Oktober", "November", "Desember"],
        days: ["Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jum'at", "Sabtu"],
    },
    "it" => Labels {
        months: ["Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno", "Luglio", "Agosto", "Settembre", "Ottobre", "Novembre", "Dicembre"],
        days: ["Dom", "Lun", "Mar", "Mer", "Gio", "Ven", "Sab"],
    },
    "jp" => Labels {
        months: ["1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月"],
        days: ["日", "月", "火", "水", "木", "金", "土"],
    },
    "kr" => Labels {
        months: ["1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월"],
        days: ["일", "월", "화", "수", "목", "금", "토"],
    },
    "nl" => Labels {
        months: ["Januari", "Februari", "Maart", "April", "Mei", "Juni", "Juli", "Augustus", "September", "Oktober", "November", "December"],
        days: ["Zo", "Ma", "Di", "Wo", "Do", "Vr", "Za"],
    },
    "no" => Labels {
        months: ["Januar", "Februar", "Mars", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober", "November", "Desember"],
        days: ["Sø", "Ma", "Ti", "On", "To", "Fr", "Lø"],
    },
    "pl" => Labels {
        months: ["Styczeń", "Luty", "Marzec", "Kwiecień", "Maj", "Czerwiec", "Lipiec", "Sierpień", "Wrzesień", "Październik", "Listopad", "Grudzień"],
        days: ["niedz.", "pon.", "wt.", "śr.", "czw.", "pt.", "sob."],
    },
    "pt" => Labels {
        months: ["Janeiro", "Fevereiro", "Marco", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro"],
        days: ["D", "S", "T", "Q", "Q", "S", "S"],
    },
    "ru" => Labels {
        months: ["Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь", "Октябрь", "Ноябрь", "Декабрь"],
        days: ["Вск", "Пн", "Вт", "Ср", "Чт", "Пт", "Сб"],
    },
    "se" => Labels {
        months: ["Januari", "Februari", "Mars", "April", "Maj", "Juni", "Juli", "Augusti", "September", "Oktober", "November", "December"],
        days: ["Sön", "Mån", "Tis", "Ons", "Tor", "Fre", "Lör"],
    },
    "sk" => Labels {
        months: ["Január", "Február", "Marec", "Apríl", "Máj", "Jún", "Júl", "August", "September", "Október", "November", "December"],
        days: ["Ne", "Po", "Ut", "St", "Št", "Pi", "So"],
    },
    "sr" => Labels {
        months: ["Јануар", "Фебруар", "Март", "Април", "Мај", "Јун", "Јул", "Август", "Септембар", "Октобар", "Новембар", "Децембар"],
        days: ["Нед", "Пон", "Уто", "Сре", "Чет", "Пет", "Суб"],
    },
    "tr" => Labels {
        months: ["Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık"],
        days: ["Paz", "Pts", "Salı", "Çar", "Per", "Cuma", "Cts"],
    },
    "ua" => Labels {
        months: ["Січень", "Лютий", "Березень", "Квітень", "Травень", "Червень", "Липень", "Серпень", "Вересень", "Жовтень", "Листопад", "Грудень"],
        days: ["Нд", "Пн", "Вт", "Ср", "Чт", "Пт", "Сб"],
    },
};

/// Month and weekday labels. Months are keyed "1".."12", days "0".."6"
/// (0 = Sunday).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub months: Option<HashMap<String, String>>,
    pub days: Option<HashMap<String, String>>,
}

impl Translation {
    /// Only translations carrying both label sets replace the locale table.
    pub fn is_complete(&self) -> bool {
        self.months.is_some() && self.days.is_some()
    }

    pub fn month_label(&self, month: u32) -> Option<&str> {
        self.months
            .as_ref()
            .and_then(|labels| labels.get(&month.to_string()))
            .map(String::as_str)
    }

    pub fn day_label(&self, dow: u32) -> Option<&str> {
        self.days
            .as_ref()
            .and_then(|labels| labels.get(&dow.to_string()))
            .map(String::as_str)
    }

    fn from_labels(labels: &Labels) -> Self {
        let numbered = |values: &[&str], first: usize| -> HashMap<String, String> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ((i + first).to_string(), (*v).to_owned()))
                .collect()
        };

        Translation {
            months: Some(numbered(&labels.months[..], 1)),
            days: Some(numbered(&labels.days[..], 0)),
        }
    }
}

/// Locale code to label set table handed to each calendar.
#[derive(Clone, Debug, Default)]
pub struct Locales(HashMap<String, Translation>);

impl Locales {
    pub fn empty() -> Self {
        Locales::default()
    }

    pub fn builtin() -> Self {
        Locales(
            BUILTIN
                .entries()
                .map(|(code, labels)| ((*code).to_owned(), Translation::from_labels(labels)))
                .collect(),
        )
    }

    pub fn insert(&mut self, code: &str, translation: Translation) {
        self.0.insert(code.to_lowercase(), translation);
    }

    pub fn with(mut self, code: &str, translation: Translation) -> Self {
        self.insert(code, translation);
        self
    }

    pub fn get(&self, code: &str) -> Option<&Translation> {
        self.0.get(&code.to_lowercase())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Picks the labels for a calendar: a complete inline translation wins,
    /// an incomplete one disables locale lookup.
    pub fn resolve<'a>(
        &'a self,
        language: &str,
        inline: Option<&'a Translation>,
    ) -> Option<&'a Translation> {
        match inline {
            Some(translation) if translation.is_complete() => Some(translation),
            Some(_) => None,
            None => self.get(language),
        }
    }
}
