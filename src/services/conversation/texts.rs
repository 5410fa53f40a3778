//! User-facing texts and button labels.

pub const WELCOME: &str =
    "Добро пожаловать на ЛПРУслуги. Доступно 2 варианта регистрации по номеру телефона и по никнейму.";
pub const WELCOME_AGAIN: &str =
    "Добро пожаловать на ЛПРУслуги. Доступно 2 варианта регистрации по номеру телефона и по никнейму:";
pub const CHOOSE_REGISTRATION: &str = "Выберите способ регистрации:";
pub const BY_HANDLE: &str = "По никнейму";
pub const BY_PHONE: &str = "По номеру телефона";

pub const PHONE_UNREADABLE: &str = "Бот не смог прочитать номер телефона (или прислан чужой номер). \
     Пожалуйста, проверьте настройки приватности. После окончания проверки их можно будет включить обратно.";
pub const HANDLE_UNREADABLE: &str = "Бот не смог прочитать никнейм. Пожалуйста, проверьте настройки \
     приватности. После окончания проверки их можно будет включить обратно.";
pub const UNRECOGNIZED: &str = "Нераспознанная команда";

pub const FAMILY_NAME_PLACEHOLDER: &str = "Фамилия";
pub const ASK_FAMILY_NAME: &str = "Для проверки введите свою фамилию:";
pub const GIVEN_NAME_PLACEHOLDER: &str = "Имя";
pub const ASK_GIVEN_NAME: &str = "И ещё для проверки введите имя:";
pub const BIRTH_DATE_PLACEHOLDER: &str = "ДД.ММ.ГГГГ";
pub const ASK_BIRTH_DATE: &str = "А также введите дату рождения в формате ДД.ММ.ГГГГ";
pub const BAD_BIRTH_DATE: &str =
    "Дата рождения введена не в формате ДД.ММ.ГГГГ Попробуйте ещё раз:";
pub const EMPTY_ANSWER: &str = "Ответ не может быть пустым. Попробуйте ещё раз:";

pub const NOT_FOUND_RETRY: &str = "Такие имя, фамилия и дата рождения не нашлись. Попробуйте ещё раз.";
pub const NOT_FOUND_FINAL_PHONE: &str =
    "Такие имя, фамилия, дата рождения и телефон не нашлись. Попытки закончились. Обратитесь в РК";
pub const NOT_FOUND_FINAL_HANDLE: &str =
    "Такие имя, фамилия, дата рождения и никнейм не нашлись. Попытки закончились. Обратитесь в РК";
pub const ATTEMPTS_EXHAUSTED: &str = "Превышено количество попыток проверки. Обратитесь в РК";
pub const DUPLICATE: &str = "В системе уже есть такой пользователь. Возможно, эта ошибка вызвана \
     тем, что вы недавно сменили телеграм-аккаунт. Обратитесь в РК";
pub const VERIFIED: &str = "Проверка пройдена!";

pub const MAIN_MENU: &str = "Вы в главном меню";
pub const UNKNOWN_COMMAND: &str = "Не знаю такой команды";
/// Menu description that renders the roster's current contact data instead of itself.
pub const CURRENT_DATA: &str = "Текущие учётные данные:";

pub const CHANGING_MENU: &str = "Вы в меню изменения учётных данных";
pub const CANCEL: &str = "Отмена";
pub const EMPTY_VALUE: &str = "(пусто)";
pub const DATA_CHANGED: &str = "Данные изменены";
pub const CHANGE_CANCELLED: &str = "Изменение отменено";
pub const EMAIL_NEEDS_AT: &str = "В email должна быть @";
pub const VALUE_REQUIRED: &str = "Новое значение не может быть пустым";

pub const EMERGENCY_WARNING: &str = "ВНИМАНИЕ! Сообщение о задержании будет немедленно разослано \
     дежурным, отменить его будет нельзя. Если вас задержали, нажмите «Меня задержали».";
pub const EMERGENCY_CONFIRM: &str = "Меня задержали";
pub const EMERGENCY_DENY: &str = "Назад";
pub const EMERGENCY_NOT_CONFIRMED: &str = "Задержание не подтверждено";
pub const EMERGENCY_SENT: &str = "Сообщение о задержании отправлено дежурным. Все следующие \
     сообщения будут пересылаться им.";

pub const CHAT_INTRO: &str = "Все следующие сообщения будут пересылаться в РК. \
     Чтобы вернуться в меню, нажмите «Выход».";
pub const EXIT: &str = "Выход";
pub const STAFF_REPLIED: &str = "Ответ от РК:";
pub const EMERGENCY_REPLIED: &str = "Ответ от дежурных:";
